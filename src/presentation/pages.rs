// Page rendering - Planner and battery-disposal HTML from `${name}` templates
use crate::presentation::summary_view::{StopRow, SummaryField};
use crate::presentation::trip_form::TripForm;
use std::collections::HashMap;

/// What the planner template needs, already formatted.
pub struct PlannerPageView<'a> {
    pub form: &'a TripForm,
    pub charger_preferences: &'a [String],
    pub summary: Vec<SummaryField>,
    pub stops: Vec<StopRow>,
    pub error: Option<&'a str>,
    pub notice: Option<&'a str>,
    pub loading: bool,
    pub tile_url: &'a str,
    pub attribution: &'a str,
}

/// Replace `${key}` placeholders in a template.
pub fn fill_template(template: &str, vars: &HashMap<&str, String>) -> String {
    let mut result = template.to_string();
    for (key, value) in vars {
        let placeholder = format!("${{{}}}", key);
        result = result.replace(&placeholder, value);
    }
    result
}

pub fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            // keeps user input from forming template placeholders
            '$' => out.push_str("&#36;"),
            _ => out.push(ch),
        }
    }
    out
}

/// JSON string literal for embedding inside `<script>`. Script text is not
/// entity-decoded, so HTML escaping does not apply there.
pub fn script_string(value: &str) -> String {
    serde_json::Value::from(value)
        .to_string()
        .replace("</", "<\\/")
        .replace('$', "\\u0024")
}

pub fn render_planner_page(view: &PlannerPageView<'_>) -> String {
    let disabled = if view.loading { " disabled" } else { "" };

    let options: String = view
        .charger_preferences
        .iter()
        .map(|pref| {
            let selected = if pref.eq_ignore_ascii_case(&view.form.charger_preference) {
                " selected"
            } else {
                ""
            };
            format!(
                "<option value=\"{0}\"{1}>{0}</option>",
                escape_html(pref),
                selected
            )
        })
        .collect();

    let summary: String = view
        .summary
        .iter()
        .map(|f| {
            format!(
                "<dt>{}</dt><dd>{}</dd>",
                escape_html(f.label),
                escape_html(&f.value)
            )
        })
        .collect();

    let stops: String = if view.stops.is_empty() {
        String::new()
    } else {
        let rows: String = view
            .stops
            .iter()
            .map(|s| {
                format!(
                    "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
                    s.sequence,
                    escape_html(&s.name),
                    escape_html(&s.address),
                    escape_html(&s.connectors),
                    escape_html(&s.power),
                    escape_html(&s.charge_time),
                    escape_html(&s.cost),
                )
            })
            .collect();
        format!("{}{}</tbody></table>", STOPS_TABLE_HEAD, rows)
    };

    let error = view
        .error
        .map(|e| format!("<p class=\"error\" role=\"alert\">{}</p>", escape_html(e)))
        .unwrap_or_default();
    let notice = view
        .notice
        .map(|n| format!("<p class=\"notice\">{}</p>", escape_html(n)))
        .unwrap_or_default();
    let loading = if view.loading {
        "<p class=\"loading\">Planning your route&hellip;</p>"
    } else {
        ""
    };

    let mut vars = HashMap::new();
    vars.insert("disabled", disabled.to_string());
    vars.insert("vehicle", escape_html(&view.form.vehicle));
    vars.insert("range_km", escape_html(&view.form.range_km));
    vars.insert("current_charge", escape_html(&view.form.current_charge));
    vars.insert("start", escape_html(&view.form.start));
    vars.insert("destination", escape_html(&view.form.destination));
    vars.insert("waypoints", escape_html(&view.form.waypoints));
    vars.insert("charger_options", options);
    vars.insert("summary", summary);
    vars.insert("stops", stops);
    vars.insert("error", error);
    vars.insert("notice", notice);
    vars.insert("loading", loading.to_string());
    vars.insert("tile_url", script_string(view.tile_url));
    vars.insert("attribution", script_string(view.attribution));

    let body = fill_template(PLANNER_BODY, &vars);
    layout("Plan your EV trip", &body)
}

pub fn render_disposal_page() -> String {
    layout("Battery disposal & recycling", DISPOSAL_BODY)
}

fn layout(title: &str, body: &str) -> String {
    let mut vars = HashMap::new();
    vars.insert("title", escape_html(title));
    vars.insert("body", body.to_string());
    fill_template(LAYOUT, &vars)
}

const LAYOUT: &str = r#"<!doctype html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>${title} | EV Trip Planner</title>
  <link rel="stylesheet" href="https://unpkg.com/leaflet@1.9.4/dist/leaflet.css" crossorigin="" />
  <style>
    body { font-family: system-ui, sans-serif; margin: 0; color: #0f172a; background: #f8fafc; }
    nav { display: flex; gap: 1.5rem; padding: 0.75rem 1.5rem; background: #0f766e; }
    nav a { color: #f0fdfa; text-decoration: none; font-weight: 600; }
    main { padding: 1.5rem; max-width: 1200px; margin: 0 auto; }
    .planner { display: grid; grid-template-columns: 340px 1fr; gap: 1.5rem; }
    form label { display: block; margin-top: 0.6rem; font-size: 0.9rem; }
    form input, form select, form textarea { width: 100%; padding: 0.4rem; box-sizing: border-box; }
    form button { margin-top: 1rem; padding: 0.5rem 1rem; }
    #map { height: 480px; border-radius: 8px; }
    dl { display: grid; grid-template-columns: max-content 1fr; gap: 0.3rem 1rem; }
    dt { font-weight: 600; }
    table { border-collapse: collapse; width: 100%; margin-top: 1rem; }
    th, td { border-bottom: 1px solid #cbd5e1; padding: 0.35rem; text-align: left; font-size: 0.9rem; }
    .error { color: #b91c1c; }
    .notice { color: #0f766e; }
    .stop-marker { background: #2563eb; color: #fff; border-radius: 50%; text-align: center; font-weight: 700; line-height: 22px; }
  </style>
</head>
<body>
  <nav>
    <a href="/">Trip planner</a>
    <a href="/battery-disposal">Battery disposal</a>
  </nav>
  <main>
${body}
  </main>
</body>
</html>
"#;

const STOPS_TABLE_HEAD: &str = "<table class=\"stops\"><thead><tr><th>#</th><th>Name</th><th>Address</th><th>Connectors</th><th>Power</th><th>Charge time</th><th>Cost</th></tr></thead><tbody>";

const PLANNER_BODY: &str = r#"    <div class="planner">
      <section>
        <form method="post" action="/" id="trip-form">
          <label>Vehicle <input name="vehicle" value="${vehicle}" required${disabled} /></label>
          <label>Range on full charge (km) <input name="range_km" type="number" min="1" step="any" value="${range_km}" required${disabled} /></label>
          <label>Current charge (%) <input name="current_charge" type="number" min="0" max="100" step="any" value="${current_charge}" required${disabled} /></label>
          <label>Start <input name="start" value="${start}" required${disabled} /></label>
          <label>Destination <input name="destination" value="${destination}" required${disabled} /></label>
          <label>Waypoints (comma separated) <input name="waypoints" value="${waypoints}"${disabled} /></label>
          <label>Charger preference <select name="charger_preference"${disabled}>${charger_options}</select></label>
          <button type="submit"${disabled}>Plan route</button>
        </form>
        ${loading}
        ${error}
        ${notice}
        <h2>Route summary</h2>
        <dl class="summary">${summary}</dl>
        ${stops}
      </section>
      <section>
        <div id="map"></div>
      </section>
    </div>
    <script src="https://unpkg.com/leaflet@1.9.4/dist/leaflet.js" crossorigin=""></script>
    <script>
      (function () {
        var form = document.getElementById('trip-form');
        form.addEventListener('submit', function () {
          Array.prototype.forEach.call(form.elements, function (el) { el.readOnly = true; });
          form.querySelector('button').disabled = true;
        });

        if (typeof L === 'undefined') { return; }
        var map = L.map('map');
        L.tileLayer(${tile_url}, { attribution: ${attribution} }).addTo(map);
        var overlays = L.layerGroup().addTo(map);
        var icons = {
          start: L.divIcon({ className: 'stop-marker', html: 'S', iconSize: [22, 22] }),
          end: L.divIcon({ className: 'stop-marker', html: 'D', iconSize: [22, 22] })
        };

        function draw(scene) {
          if (!scene) { return; }
          overlays.clearLayers();
          if (scene.center) { map.setView(scene.center, scene.zoom); }
          if (scene.path.length > 1) { L.polyline(scene.path, { color: '#2563eb', weight: 5 }).addTo(overlays); }
          scene.markers.forEach(function (m) {
            var icon = m.kind === 'charging'
              ? L.divIcon({ className: 'stop-marker', html: String(m.sequence), iconSize: [22, 22] })
              : icons[m.kind];
            L.marker(m.position, { icon: icon, title: m.label }).bindPopup(m.label).addTo(overlays);
          });
          if (scene.fitBounds) { map.fitBounds(scene.fitBounds, { padding: [30, 30] }); }
        }

        fetch('/api/map/ready', { method: 'POST' })
          .then(function (r) { return r.json(); })
          .then(draw);
      })();
    </script>"#;

const DISPOSAL_BODY: &str = r#"    <article>
      <h1>Battery disposal &amp; recycling</h1>
      <p>Electric-vehicle traction batteries contain lithium, nickel, cobalt and manganese.
      They must never go to landfill or household waste: damaged cells can catch fire and
      leak electrolyte.</p>
      <h2>When a pack reaches end of life</h2>
      <ul>
        <li>Most packs keep 70&ndash;80% of their capacity when retired from a vehicle and can be
        reused for stationary storage before recycling.</li>
        <li>Return the pack through the vehicle manufacturer or an authorised dealer; producers are
        responsible for take-back under extended producer responsibility rules.</li>
        <li>Only certified recyclers may dismantle packs. Hydrometallurgical processes recover
        over 90% of the lithium, cobalt and nickel.</li>
      </ul>
      <h2>Handling damaged batteries</h2>
      <ul>
        <li>Keep a swollen, dented or overheating pack outdoors and away from buildings.</li>
        <li>Do not open, puncture or attempt to discharge the pack yourself.</li>
        <li>Contact the manufacturer's emergency line or local fire service for transport advice.</li>
      </ul>
      <h2>Small batteries</h2>
      <p>12 V auxiliary batteries and portable charger batteries go to designated battery
      collection points at service centres and municipal recycling facilities.</p>
    </article>"#;
