use crate::models::DashboardRequest;

pub fn render_index(request: DashboardRequest) -> String {
    INDEX_HTML
        .replace("{{WINDOW_DAYS}}", &request.window_days.to_string())
        .replace("{{RECENT_LIMIT}}", &request.recent_limit.to_string())
}

const INDEX_HTML: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Lead Console</title>
  <style>
    :root {
      --bg: #f4f6fb;
      --ink: #1f2937;
      --muted: #6b7280;
      --card: #ffffff;
      --accent: #4f46e5;
      --danger: #b91c1c;
      --shadow: 0 12px 32px rgba(31, 41, 55, 0.08);
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      background: var(--bg);
      color: var(--ink);
      font-family: "Inter", "Segoe UI", sans-serif;
      padding: 32px 18px 48px;
    }

    .app {
      width: min(1080px, 100%);
      margin: 0 auto;
      display: grid;
      gap: 20px;
    }

    header {
      display: flex;
      justify-content: space-between;
      align-items: center;
    }

    button {
      border: 0;
      border-radius: 10px;
      padding: 10px 16px;
      background: var(--accent);
      color: #fff;
      cursor: pointer;
    }

    button[disabled] {
      opacity: 0.5;
      cursor: progress;
    }

    .cards {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(180px, 1fr));
      gap: 14px;
    }

    .card, .panel {
      background: var(--card);
      border-radius: 16px;
      box-shadow: var(--shadow);
      padding: 18px;
    }

    .card .value {
      font-size: 1.8rem;
      font-weight: 600;
    }

    .muted {
      color: var(--muted);
    }

    .banner {
      border-radius: 12px;
      padding: 12px 16px;
      background: #fee2e2;
      color: var(--danger);
      display: none;
    }

    .bar {
      display: flex;
      height: 14px;
      border-radius: 7px;
      overflow: hidden;
      margin: 6px 0 12px;
    }

    table {
      width: 100%;
      border-collapse: collapse;
    }

    td, th {
      text-align: left;
      padding: 8px 6px;
      border-bottom: 1px solid #eef0f4;
    }

    .badge {
      border-radius: 999px;
      padding: 2px 10px;
      font-size: 0.8rem;
    }
  </style>
</head>
<body>
  <main class="app">
    <header>
      <div>
        <h1>Pipeline dashboard</h1>
        <p class="muted">Last {{WINDOW_DAYS}} days, {{RECENT_LIMIT}} most recent leads</p>
      </div>
      <button id="refresh" type="button">Refresh</button>
    </header>
    <div id="banner" class="banner"></div>
    <section id="cards" class="cards"></section>
    <section class="panel">
      <h2>New leads per day</h2>
      <div id="trend"></div>
    </section>
    <section class="panel">
      <h2>Leads by stage</h2>
      <div id="distribution"></div>
    </section>
    <section class="panel">
      <h2>Recent leads</h2>
      <table>
        <thead><tr><th>Customer</th><th>Intent</th><th>Stage</th><th>Hotness</th><th>Score</th></tr></thead>
        <tbody id="recent"></tbody>
      </table>
    </section>
  </main>
  <script>
    const escape = (text) => String(text).replace(/[&<>"]/g, (c) => ({ "&": "&amp;", "<": "&lt;", ">": "&gt;", '"': "&quot;" })[c]);
    const refreshButton = document.getElementById("refresh");
    const colors = { hot: "#ef4444", warm: "#f97316", cold: "#3b82f6" };

    function render(state) {
      refreshButton.disabled = state.loading;
      const banner = document.getElementById("banner");
      if (state.error) {
        banner.style.display = "block";
        banner.textContent = state.stale
          ? `Showing previous data: ${state.error.message}`
          : `Dashboard unavailable: ${state.error.message}`;
      } else {
        banner.style.display = "none";
      }
      const view = state.view_model;
      if (!view) {
        return;
      }
      const s = view.summary;
      document.getElementById("cards").innerHTML = [
        ["Conversations", s.total_conversations],
        ["Leads", s.total_leads],
        ["Hot leads", s.hot_leads],
        ["Conversion", `${s.conversion_rate.toFixed(1)}%`],
      ].map(([label, value]) => `<div class="card"><div class="muted">${label}</div><div class="value">${value}</div></div>`).join("");

      document.getElementById("trend").innerHTML = view.trend.map((p) => {
        const total = Math.max(p.total, 1);
        const part = (key) => `<span style="width:${(p[key] / total) * 100}%;background:${colors[key]}"></span>`;
        return `<div>${escape(p.label)} <span class="muted">${p.total}</span><div class="bar">${part("hot")}${part("warm")}${part("cold")}</div></div>`;
      }).join("");

      const stageTotal = view.distribution.reduce((sum, d) => sum + d.value, 0) || 1;
      document.getElementById("distribution").innerHTML =
        `<div class="bar">${view.distribution.map((d) => `<span title="${escape(d.label)}" style="width:${(d.value / stageTotal) * 100}%;background:${d.color}"></span>`).join("")}</div>` +
        view.distribution.map((d) => `<span class="badge" style="background:${d.color};color:#fff">${escape(d.label)} ${d.value}</span>`).join(" ");

      document.getElementById("recent").innerHTML = view.recent.map((lead) => `<tr>
        <td>${escape(lead.customer_name)}</td>
        <td>${escape(lead.intent)}</td>
        <td><span class="badge ${lead.stage_class}">${escape(lead.stage_label)}</span></td>
        <td><span class="badge ${lead.hotness_class}">${escape(lead.hotness_label)}</span></td>
        <td>${lead.score}</td>
      </tr>`).join("");
    }

    async function poll() {
      const response = await fetch("/api/dashboard");
      const state = await response.json();
      render(state);
      if (state.loading) {
        setTimeout(poll, 500);
      }
    }

    refreshButton.addEventListener("click", async () => {
      const response = await fetch("/api/dashboard/refresh", { method: "POST" });
      if (response.ok) {
        render(await response.json());
        poll();
      }
    });

    poll();
  </script>
</body>
</html>
"##;
