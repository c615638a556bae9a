use std::sync::Arc;

use axum::extract::State;
use axum::response::Html;
use axum_extra::extract::cookie::CookieJar;

use super::{auth, AppState};

/// `GET /`: the login form without a live session, the dashboard with one.
pub async fn index(State(state): State<Arc<AppState>>, jar: CookieJar) -> Html<&'static str> {
    if auth::session_is_valid(&state.sessions, &jar) {
        Html(DASHBOARD_HTML)
    } else {
        Html(LOGIN_HTML)
    }
}

const LOGIN_HTML: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>MIT Decarbonization</title>
    <style>
        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
            background: #f5f5f5;
            display: flex;
            flex-direction: column;
            align-items: center;
            padding-top: 10vh;
        }
        h1 { color: #333; }
        form {
            background: white;
            padding: 24px;
            border-radius: 8px;
            box-shadow: 0 2px 4px rgba(0,0,0,0.1);
            display: flex;
            gap: 10px;
        }
        input[type=password] {
            padding: 8px;
            border: 1px solid #ddd;
            border-radius: 4px;
            font-size: 14px;
        }
        button {
            padding: 8px 16px;
            border: none;
            border-radius: 4px;
            background: #007bff;
            color: white;
            cursor: pointer;
        }
        .error { color: #c0392b; font-size: 14px; }
    </style>
</head>
<body>
    <h1>MIT Decarbonization</h1>
    <form method="post" action="/login">
        <input type="password" name="password" placeholder="Password" autofocus>
        <button type="submit">Enter</button>
    </form>
    <p class="error" id="error" hidden>Incorrect password.</p>
    <script>
        if (new URLSearchParams(window.location.search).get('error')) {
            document.getElementById('error').hidden = false;
        }
    </script>
</body>
</html>"##;

const DASHBOARD_HTML: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>MIT Decarbonization</title>
    <script src="https://cdn.plot.ly/plotly-2.27.0.min.js"></script>
    <style>
        * { box-sizing: border-box; }
        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
            margin: 0;
            padding: 20px;
            background: #f5f5f5;
        }
        h1 { color: #333; }
        .tabs { display: flex; gap: 4px; margin-bottom: 16px; }
        .tabs button {
            padding: 8px 20px;
            border: none;
            border-radius: 4px 4px 0 0;
            background: #ddd;
            cursor: pointer;
            font-size: 14px;
        }
        .tabs button.active { background: white; font-weight: 600; }
        .panel {
            background: white;
            padding: 16px;
            border-radius: 0 8px 8px 8px;
            box-shadow: 0 2px 4px rgba(0,0,0,0.1);
        }
        .columns { display: flex; gap: 20px; flex-wrap: wrap; }
        .columns > div { flex: 1; min-width: 360px; }
        label { font-weight: 600; display: block; margin: 10px 0 4px; color: #555; }
        select {
            width: 100%;
            padding: 8px;
            border: 1px solid #ddd;
            border-radius: 4px;
            font-size: 14px;
        }
        .chart { height: 55vh; min-height: 400px; }
        a.download {
            display: inline-block;
            margin: 10px 8px 0 0;
            padding: 8px 16px;
            border-radius: 4px;
            background: #007bff;
            color: white;
            text-decoration: none;
            font-size: 14px;
        }
        table.meta { border-collapse: collapse; margin-top: 10px; width: 100%; }
        table.meta td {
            border: 1px solid #eee;
            padding: 6px 10px;
            font-size: 14px;
        }
        table.meta td:first-child { font-weight: 600; color: #555; }
    </style>
</head>
<body>
    <h1>MIT Decarbonization</h1>

    <div class="tabs">
        <button id="tab-buildings" class="active" onclick="showTab('buildings')">Buildings</button>
        <button id="tab-scenarios" onclick="showTab('scenarios')">Scenarios</button>
    </div>

    <div id="panel-buildings" class="panel">
        <a class="download" href="/download/buildings.csv">Download all building metadata</a>
        <label for="buildingSelect">Building</label>
        <select id="buildingSelect" onchange="buildingChanged()"></select>
        <div class="columns">
            <div>
                <label for="buildingScenarioSelect">Building Demand Scenario</label>
                <select id="buildingScenarioSelect" onchange="drawBuildingChart()"></select>
                <div id="buildingChart" class="chart"></div>
            </div>
            <div>
                <label>Building metadata</label>
                <table class="meta" id="buildingMeta"></table>
            </div>
        </div>
    </div>

    <div id="panel-scenarios" class="panel" hidden>
        <label for="scenarioSelect">Demand Scenario</label>
        <select id="scenarioSelect" onchange="scenarioChanged()"></select>
        <span id="scenarioDownloads"></span>
        <div id="scenarioChart" class="chart"></div>
    </div>

    <script>
        const ENDUSE_COLORS = {
            'Heating': '#FF7671',
            'Cooling': '#6D68E6',
            'Lighting': '#FFD700',
            'Equipment': '#90EE90',
        };

        let buildings = [];
        let scenarios = [];

        function showTab(name) {
            for (const tab of ['buildings', 'scenarios']) {
                document.getElementById('panel-' + tab).hidden = tab !== name;
                document.getElementById('tab-' + tab).classList.toggle('active', tab === name);
            }
        }

        async function getJson(url) {
            const resp = await fetch(url);
            if (!resp.ok) throw new Error('request failed: ' + resp.status);
            return resp.json();
        }

        function fillSelect(select, options) {
            select.innerHTML = '';
            for (const opt of options) {
                const el = document.createElement('option');
                el.value = opt.id;
                el.textContent = opt.name;
                select.appendChild(el);
            }
        }

        function traces(rows) {
            const byUse = new Map();
            for (const row of rows) {
                const use = row['End Use'];
                if (!byUse.has(use)) byUse.set(use, { x: [], y: [] });
                byUse.get(use).x.push(row['Timestamp']);
                byUse.get(use).y.push(row['Energy [J]']);
            }
            return [...byUse.entries()].map(([use, data]) => ({
                x: data.x,
                y: data.y,
                name: use,
                type: 'scatter',
                mode: 'lines',
                line: { color: ENDUSE_COLORS[use] },
            }));
        }

        function drawChart(div, chart) {
            Plotly.react(document.getElementById(div), traces(chart.rows), {
                title: chart.title,
                xaxis: { title: 'Timestamp' },
                yaxis: { title: 'Energy [J]' },
            }, { responsive: true });
        }

        function renderMeta(building) {
            const table = document.getElementById('buildingMeta');
            table.innerHTML = '';
            for (const [key, value] of Object.entries(building)) {
                const row = table.insertRow();
                row.insertCell().textContent = key;
                row.insertCell().textContent = value === null ? '' : value;
            }
        }

        async function buildingChanged() {
            const buildingId = document.getElementById('buildingSelect').value;
            const building = buildings.find(b => String(b.id) === buildingId);
            if (building) renderMeta(building);

            const options = await getJson(`/api/buildings/${buildingId}/scenarios`);
            fillSelect(document.getElementById('buildingScenarioSelect'), options);
            if (options.length) await drawBuildingChart();
        }

        async function drawBuildingChart() {
            const buildingId = document.getElementById('buildingSelect').value;
            const scenarioId = document.getElementById('buildingScenarioSelect').value;
            const chart = await getJson(`/api/scenarios/${scenarioId}/buildings/${buildingId}/chart`);
            drawChart('buildingChart', chart);
        }

        async function scenarioChanged() {
            const scenarioId = document.getElementById('scenarioSelect').value;
            const scenario = scenarios.find(s => String(s.id) === scenarioId);
            document.getElementById('scenarioDownloads').innerHTML = `
                <a class="download" href="/download/scenarios/${scenarioId}/results.csv">Download scenario results</a>
                <a class="download" href="/download/scenarios/${scenarioId}/buildings_results.csv">Download scenario buildings results</a>`;
            const chart = await getJson(`/api/scenarios/${scenarioId}/chart`);
            drawChart('scenarioChart', chart);
        }

        async function init() {
            buildings = await getJson('/api/buildings');
            scenarios = await getJson('/api/scenarios');
            fillSelect(document.getElementById('buildingSelect'), buildings);
            fillSelect(document.getElementById('scenarioSelect'), scenarios);
            if (buildings.length) await buildingChanged();
            if (scenarios.length) await scenarioChanged();
        }

        init().catch(err => console.error(err));
    </script>
</body>
</html>"##;
