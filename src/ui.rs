use crate::models::SessionSnapshot;

pub fn render_index(today: &str, session: &SessionSnapshot) -> String {
    let user = session.user.as_ref();
    let name = user.map(|user| user.name.as_str()).unwrap_or("");
    let avatar = user
        .and_then(|user| user.profile_image.as_deref())
        .unwrap_or("");
    let avatar_class = if avatar.is_empty() {
        "avatar hidden"
    } else {
        "avatar"
    };
    INDEX_HTML
        .replace("{{TODAY}}", &escape_html(today))
        .replace("{{NAME}}", &escape_html(name))
        .replace("{{AVATAR}}", &escape_html(avatar))
        .replace("{{AVATAR_CLASS}}", avatar_class)
}

fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Mood Tracker</title>
  <style>
    :root {
      --bg: #f5f5ff;
      --ink: #21214d;
      --muted: #57577b;
      --accent: #4865db;
      --card: #ffffff;
      --shadow: 0 12px 40px rgba(33, 33, 77, 0.12);
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: linear-gradient(180deg, var(--bg), #e0e0ff);
      color: var(--ink);
      font-family: "Reddit Sans", "Trebuchet MS", sans-serif;
      padding: 32px 18px 48px;
    }

    .app {
      width: min(980px, 100%);
      margin: 0 auto;
      display: grid;
      gap: 24px;
    }

    nav {
      display: flex;
      justify-content: space-between;
      align-items: center;
    }

    #nav-user {
      display: flex;
      align-items: center;
      gap: 8px;
    }

    .avatar {
      width: 32px;
      height: 32px;
      border-radius: 50%;
      object-fit: cover;
    }

    .card {
      background: var(--card);
      border-radius: 16px;
      box-shadow: var(--shadow);
      padding: 24px;
    }

    .hidden {
      display: none !important;
    }

    .hero {
      text-align: center;
    }

    .hero .hello {
      color: var(--accent);
      font-weight: 700;
      margin: 0;
    }

    .hero h1 {
      margin: 8px 0;
      font-size: clamp(1.8rem, 4vw, 2.8rem);
    }

    .muted {
      color: var(--muted);
    }

    button {
      border: none;
      border-radius: 10px;
      background: var(--accent);
      color: #fff;
      font: inherit;
      font-weight: 600;
      padding: 12px 18px;
      cursor: pointer;
    }

    button.link {
      background: transparent;
      color: var(--accent);
      padding: 6px 8px;
    }

    input[type="text"], input[type="email"], input[type="password"], textarea {
      width: 100%;
      padding: 10px 12px;
      border: 2px solid #e0e0ff;
      border-radius: 10px;
      font: inherit;
    }

    textarea {
      min-height: 140px;
      resize: none;
    }

    form {
      display: grid;
      gap: 12px;
    }

    .error {
      color: #b42318;
      min-height: 1.2em;
    }

    .options {
      display: grid;
      gap: 10px;
    }

    .options.tags {
      display: flex;
      flex-wrap: wrap;
    }

    .options label {
      border: 2px solid #e0e0ff;
      border-radius: 10px;
      padding: 10px 14px;
      display: flex;
      gap: 8px;
      align-items: center;
    }

    .progress {
      display: grid;
      grid-template-columns: repeat(4, 1fr);
      gap: 8px;
      margin-bottom: 16px;
    }

    .progress span {
      height: 6px;
      border-radius: 3px;
      background: #e0e0ff;
    }

    .progress span.done {
      background: var(--accent);
    }

    .grid {
      display: grid;
      grid-template-columns: 1fr 2fr;
      gap: 24px;
    }

    .stat {
      border-radius: 14px;
      padding: 20px;
      background: #e0e0ff;
      margin-bottom: 16px;
    }

    .stat.sleep {
      background: var(--accent);
      color: #fff;
    }

    #chart text {
      font-size: 11px;
      fill: var(--muted);
    }

    .toast {
      position: fixed;
      top: 18px;
      right: 18px;
      background: var(--ink);
      color: #fff;
      padding: 12px 16px;
      border-radius: 10px;
    }

    @media (max-width: 720px) {
      .grid {
        grid-template-columns: 1fr;
      }
    }
  </style>
</head>
<body>
  <main class="app">
    <nav>
      <strong>Mood tracker</strong>
      <div id="nav-user" class="hidden">
        <img id="nav-avatar" class="{{AVATAR_CLASS}}" src="{{AVATAR}}" alt="">
        <span id="nav-name">{{NAME}}</span>
        <button class="link" id="settings-open" type="button">Settings</button>
        <button class="link" id="logout" type="button">Logout</button>
      </div>
    </nav>

    <p id="loading" class="muted">Loading...</p>

    <section id="auth" class="card hidden">
      <form id="login-form">
        <h2>Log in</h2>
        <input type="email" name="email" placeholder="Email" required />
        <input type="password" name="password" placeholder="Password" required />
        <button type="submit">Log in</button>
        <button class="link" type="button" id="show-signup">Need an account? Sign up</button>
      </form>
      <form id="signup-form" class="hidden">
        <h2>Create an account</h2>
        <input type="text" name="name" placeholder="Name" required />
        <input type="email" name="email" placeholder="Email" required />
        <input type="password" name="password" placeholder="Password" required />
        <input type="text" name="profileImage" placeholder="Profile image URL (optional)" />
        <button type="submit">Sign up</button>
        <button class="link" type="button" id="show-login">Already have an account? Log in</button>
      </form>
      <p class="error" id="auth-error"></p>
    </section>

    <section id="home" class="hidden">
      <div class="hero">
        <p class="hello">Hello, <span id="hero-name">{{NAME}}</span>!</p>
        <h1>How are you feeling today?</h1>
        <p class="muted">{{TODAY}}</p>
        <button id="log-mood" type="button" class="hidden">Log today's mood</button>
      </div>

      <div id="settings" class="card hidden">
        <form id="name-form">
          <h3>Update your name</h3>
          <input type="text" name="name" placeholder="Enter your new name" required />
          <button type="submit">Save changes</button>
        </form>
      </div>

      <div id="wizard" class="card hidden">
        <h2>Log your mood</h2>
        <div class="progress" id="progress"></div>
        <div id="step"></div>
        <p class="error" id="wizard-error"></p>
        <button id="wizard-next" type="button">Continue</button>
      </div>

      <div id="today" class="card hidden">
        <p class="muted">I'm feeling</p>
        <h2 id="today-mood"></h2>
        <p><strong>Sleep:</strong> <span id="today-sleep"></span> hours</p>
        <p id="today-journal"></p>
        <p class="muted"><i id="today-tags"></i></p>
      </div>

      <div class="grid" id="trends">
        <div class="card">
          <h3>Average Mood <small class="muted">(Last 5 Check-ins)</small></h3>
          <div class="stat" id="avg-mood"></div>
          <h3>Average Sleep <small class="muted">(Last 5 Check-ins)</small></h3>
          <div class="stat sleep" id="avg-sleep"></div>
        </div>
        <div class="card">
          <h3>Mood and sleep trends</h3>
          <svg id="chart" viewBox="0 0 600 300" aria-label="Sleep chart" role="img"></svg>
        </div>
      </div>
    </section>
  </main>

  <div id="toast" class="toast hidden"></div>

  <script>
    const FEELINGS = ['joyful', 'down', 'anxious', 'calm', 'excited', 'frustrated', 'lonely',
      'stressed', 'overwhelmed', 'grateful', 'motivated', 'hopeful', 'peaceful', 'content',
      'relaxed', 'energetic', 'exhausted', 'disappointed', 'optimistic'];
    const MOODS = [[5, 'Very Happy'], [4, 'Happy'], [3, 'Neutral'], [2, 'Sad'], [1, 'Very Sad']];
    const SLEEP = ['+9', '7 - 8', '5 - 6', '3 - 4', '0 - 2'];

    const $ = (id) => document.getElementById(id);
    const show = (el, visible) => el.classList.toggle('hidden', !visible);

    async function api(method, path, body) {
      const options = { method, headers: { 'Content-Type': 'application/json' } };
      if (body !== undefined) {
        options.body = JSON.stringify(body);
      }
      const response = await fetch(path, options);
      const text = await response.text();
      const data = text ? JSON.parse(text) : null;
      if (!response.ok) {
        throw new Error((data && data.message) || 'Something went wrong');
      }
      return data;
    }

    function toast(message) {
      const el = $('toast');
      el.textContent = message;
      show(el, true);
      setTimeout(() => show(el, false), 3000);
    }

    function formJson(form) {
      return Object.fromEntries(new FormData(form).entries());
    }

    async function loadSession() {
      const session = await api('GET', '/api/session');
      if (session.loading) {
        setTimeout(loadSession, 200);
        return;
      }
      show($('loading'), false);
      renderSession(session);
    }

    function renderSession(session) {
      show($('auth'), !session.isAuthenticated);
      show($('home'), session.isAuthenticated);
      show($('nav-user'), session.isAuthenticated);
      if (session.isAuthenticated) {
        renderUser(session.user);
        loadDashboard();
      }
    }

    function renderUser(user) {
      $('nav-name').textContent = user.name;
      $('hero-name').textContent = user.name;
      const avatar = $('nav-avatar');
      if (user.profileImage) {
        avatar.src = user.profileImage;
      } else {
        avatar.removeAttribute('src');
      }
      show(avatar, Boolean(user.profileImage));
    }

    async function submitAuth(event, path) {
      event.preventDefault();
      $('auth-error').textContent = '';
      try {
        const body = formJson(event.target);
        if (body.profileImage === '') {
          delete body.profileImage;
        }
        renderSession(await api('POST', path, body));
      } catch (err) {
        $('auth-error').textContent = err.message;
      }
    }

    async function loadDashboard() {
      try {
        const dashboard = await api('GET', '/api/dashboard');
        renderDashboard(dashboard);
      } catch (err) {
        toast(err.message);
      }
    }

    function renderDashboard(dashboard) {
      show($('log-mood'), !dashboard.submittedToday);
      show($('today'), dashboard.submittedToday && dashboard.latest);
      if (dashboard.latest) {
        $('today-mood').textContent = dashboard.latest.mood.label;
        $('today-sleep').textContent = dashboard.latest.sleepHours;
        $('today-journal').textContent = dashboard.latest.journalEntry;
        $('today-tags').textContent = dashboard.latest.hashtags;
      }

      const averages = dashboard.averages;
      if (averages.status === 'ready') {
        $('avg-mood').style.background = averages.moodColor;
        $('avg-mood').innerHTML = '<h2></h2>';
        $('avg-mood').querySelector('h2').textContent = averages.moodLabel;
        $('avg-sleep').innerHTML = '<h2></h2>';
        $('avg-sleep').querySelector('h2').textContent = `${averages.sleep} Hours`;
      } else {
        $('avg-mood').style.background = '';
        $('avg-mood').innerHTML = '<h2>Keep tracking!</h2><p>Log 5 check-ins to see your average mood.</p>';
        $('avg-sleep').innerHTML = '<h2>Not enough data yet!</h2><p>Track 5 nights to view average sleep.</p>';
      }
      renderChart(dashboard.chart);
    }

    function renderChart(chart) {
      const svg = $('chart');
      const width = 600;
      const height = 300;
      const left = 60;
      const bottom = 30;
      const top = 16;
      const plotHeight = height - top - bottom;
      const y = (value) => top + plotHeight - ((value - 1) / 4) * plotHeight;

      let markup = '';
      for (const tick of chart.yAxis) {
        markup += `<text x="${left - 8}" y="${y(tick.value) + 4}" text-anchor="end">${tick.label}</text>`;
      }
      if (chart.values.length === 0) {
        markup += `<text x="${width / 2}" y="${height / 2}" text-anchor="middle">No check-ins yet</text>`;
        svg.innerHTML = markup;
        return;
      }

      const slot = (width - left - 10) / chart.values.length;
      const barWidth = Math.min(40, slot * 0.6);
      chart.values.forEach((value, index) => {
        const x = left + index * slot + (slot - barWidth) / 2;
        const barTop = y(value) - 8;
        const barHeight = height - bottom - barTop;
        markup += `<rect x="${x}" y="${barTop}" width="${barWidth}" height="${barHeight}" rx="12" fill="${chart.colors[index]}" />`;
        markup += `<text x="${x + barWidth / 2}" y="${height - 10}" text-anchor="middle">${chart.categories[index]}</text>`;
      });
      svg.innerHTML = markup;
    }

    function renderProgress(stepNumber) {
      $('progress').innerHTML = [1, 2, 3, 4]
        .map((step) => `<span class="${step <= stepNumber ? 'done' : ''}"></span>`)
        .join('');
    }

    function radioOptions(name, options, selected) {
      return '<div class="options">' + options
        .map(([value, label]) => `<label><input type="radio" name="${name}" value="${value}" ${String(selected) === String(value) ? 'checked' : ''} /> ${label}</label>`)
        .join('') + '</div>';
    }

    function renderWizard(form) {
      renderProgress(form.stepNumber);
      $('wizard-error').textContent = '';
      $('wizard-next').textContent = form.isLastStep ? 'Submit' : 'Continue';
      let markup = '';
      switch (form.step) {
        case 'overall_mood':
          markup = '<h3>How was your mood today?</h3>' + radioOptions('overallMood', MOODS, form.overallMood);
          break;
        case 'feelings':
          markup = '<h3>How did you feel?</h3><p class="muted">Select up to three tags:</p><div class="options tags">' +
            FEELINGS.map((tag) => `<label><input type="checkbox" name="feelings" value="${tag}" ${form.feelings.includes(tag) ? 'checked' : ''} /> ${tag[0].toUpperCase() + tag.slice(1)}</label>`).join('') +
            '</div>';
          break;
        case 'journal':
          markup = '<h3>Write about your day...</h3><textarea name="journalEntry" placeholder="Today, I felt..."></textarea>';
          break;
        default:
          markup = '<h3>How many hours did you sleep?</h3>' + radioOptions('sleepHours', SLEEP.map((value) => [value, `${value} hours`]), form.sleepHours);
      }
      $('step').innerHTML = markup;
      const journal = $('step').querySelector('textarea');
      if (journal) {
        journal.value = form.journalEntry;
      }
      show($('wizard'), true);
    }

    function stepInput(step) {
      const root = $('step');
      const checked = (name) => root.querySelector(`input[name="${name}"]:checked`);
      switch (step) {
        case 'overall_mood': {
          const input = checked('overallMood');
          return input ? { overallMood: Number(input.value) } : {};
        }
        case 'feelings':
          return { feelings: [...root.querySelectorAll('input[name="feelings"]:checked')].map((el) => el.value) };
        case 'journal':
          return { journalEntry: root.querySelector('textarea').value };
        default: {
          const input = checked('sleepHours');
          return { sleepHours: input ? input.value : '' };
        }
      }
    }

    let currentForm = null;

    $('log-mood').addEventListener('click', async () => {
      currentForm = await api('GET', '/api/mood-form');
      renderWizard(currentForm);
    });

    $('wizard-next').addEventListener('click', async () => {
      const input = stepInput(currentForm.step);
      try {
        if (currentForm.isLastStep) {
          const result = await api('POST', '/api/mood-form/submit', input);
          currentForm = null;
          show($('wizard'), false);
          toast(result.message || 'Mood logged');
          loadDashboard();
        } else {
          currentForm = await api('POST', '/api/mood-form/continue', input);
          renderWizard(currentForm);
        }
      } catch (err) {
        $('wizard-error').textContent = err.message;
      }
    });

    $('login-form').addEventListener('submit', (event) => submitAuth(event, '/api/auth/login'));
    $('signup-form').addEventListener('submit', (event) => submitAuth(event, '/api/auth/signup'));
    $('show-signup').addEventListener('click', () => {
      show($('login-form'), false);
      show($('signup-form'), true);
    });
    $('show-login').addEventListener('click', () => {
      show($('signup-form'), false);
      show($('login-form'), true);
    });

    $('logout').addEventListener('click', async () => {
      renderSession(await api('POST', '/api/auth/logout'));
    });

    $('settings-open').addEventListener('click', () => {
      show($('settings'), $('settings').classList.contains('hidden'));
    });

    $('name-form').addEventListener('submit', async (event) => {
      event.preventDefault();
      try {
        renderUser(await api('POST', '/api/profile/name', formJson(event.target)));
        show($('settings'), false);
        toast('Profile updated');
      } catch (err) {
        toast(err.message);
      }
    });

    loadSession();
  </script>
</body>
</html>
"#;
