//! UI Routes - the set brief form
//!
//! Vanilla HTML/JS; the form posts JSON to `/api/generate-playlist`. An
//! authentication redirect from the API sends the browser to `/login`.

use axum::{
    response::{Html, IntoResponse},
    routing::get,
    Router,
};

use crate::AppState;

/// Build UI routes
pub fn ui_routes() -> Router<AppState> {
    Router::new().route("/", get(root_page))
}

/// Root page - set brief form
async fn root_page() -> impl IntoResponse {
    Html(ROOT_PAGE)
}

const ROOT_PAGE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>djset-ai - DJ Set Curator</title>
    <style>
        body {
            font-family: system-ui, -apple-system, sans-serif;
            max-width: 800px;
            margin: 40px auto;
            padding: 20px;
            line-height: 1.6;
        }
        h1 {
            color: #333;
            border-bottom: 2px solid #0066cc;
            padding-bottom: 10px;
        }
        label {
            display: block;
            margin-top: 12px;
            font-weight: 600;
        }
        input[type=text], input[type=date], select {
            width: 100%;
            padding: 8px;
            box-sizing: border-box;
        }
        .button {
            display: inline-block;
            padding: 10px 20px;
            background: #0066cc;
            color: white;
            border: none;
            border-radius: 4px;
            margin: 16px 5px 0 0;
            cursor: pointer;
        }
        .button:hover {
            background: #0052a3;
        }
        .button:disabled {
            background: #999;
        }
        pre {
            background: #f4f4f4;
            padding: 12px;
            white-space: pre-wrap;
        }
        .error {
            color: #b00020;
        }
        .stats {
            margin-top: 16px;
        }
    </style>
</head>
<body>
    <h1>DJ Set Curator</h1>
    <p><a href="/login">Connect Spotify</a> &middot; <a href="/logout">Disconnect</a></p>

    <form id="brief">
        <label for="venue">Venue</label>
        <input type="text" id="venue" name="venue" required>

        <label for="date">Date</label>
        <input type="date" id="date" name="date" required>

        <label for="style">Style</label>
        <input type="text" id="style" name="style" placeholder="e.g. Timba heavy" required>

        <label for="sourceCorpusId">Corpus playlist</label>
        <select id="sourceCorpusId" name="sourceCorpusId">
            <option value="">Default corpus playlist</option>
        </select>

        <label><input type="checkbox" id="createPlaylist" checked> Create Spotify playlist</label>

        <button type="submit" class="button" id="submit">Generate set</button>
    </form>

    <div id="result"></div>

    <script>
        const form = document.getElementById('brief');
        const result = document.getElementById('result');
        const submit = document.getElementById('submit');

        fetch('/api/spotify/playlists', { redirect: 'manual' })
            .then(res => res.ok ? res.json() : [])
            .then(playlists => {
                const select = document.getElementById('sourceCorpusId');
                for (const p of playlists) {
                    const option = document.createElement('option');
                    option.value = p.id;
                    option.textContent = `${p.name} (${p.trackCount})`;
                    select.appendChild(option);
                }
            })
            .catch(() => {});

        function escapeHtml(text) {
            const div = document.createElement('div');
            div.textContent = text;
            return div.innerHTML;
        }

        form.addEventListener('submit', async (event) => {
            event.preventDefault();
            submit.disabled = true;
            result.innerHTML = '<p>Generating...</p>';

            const body = {
                venue: document.getElementById('venue').value,
                date: document.getElementById('date').value,
                style: document.getElementById('style').value,
                sourceCorpusId: document.getElementById('sourceCorpusId').value || null,
                createPlaylist: document.getElementById('createPlaylist').checked,
            };

            try {
                const res = await fetch('/api/generate-playlist', {
                    method: 'POST',
                    headers: { 'Content-Type': 'application/json' },
                    body: JSON.stringify(body),
                    redirect: 'manual',
                });

                if (res.type === 'opaqueredirect') {
                    window.location.href = '/login';
                    return;
                }

                const json = await res.json();
                if (!json.success) {
                    result.innerHTML = `<p class="error">${escapeHtml(json.error)}</p>`;
                    return;
                }

                const data = json.data;
                let html = `<div class="stats">Provider: ${escapeHtml(data.provider)}<br>`
                    + `Songs: ${data.totalSongs}, found: ${data.foundSongs}, not found: ${data.notFoundSongs}`;
                if (data.newPlaylistId) {
                    html += `<br><a href="https://open.spotify.com/playlist/${encodeURIComponent(data.newPlaylistId)}" target="_blank">Open playlist</a>`;
                }
                html += '</div>';
                if (data.notFound && data.notFound.length) {
                    html += '<h3>Not found in corpus</h3><ul>'
                        + data.notFound.map(s => `<li>${escapeHtml(s)}</li>`).join('')
                        + '</ul>';
                }
                html += `<h3>Set</h3><pre>${escapeHtml(data.playlist)}</pre>`;
                result.innerHTML = html;
            } catch (err) {
                result.innerHTML = `<p class="error">${escapeHtml(String(err))}</p>`;
            } finally {
                submit.disabled = false;
            }
        });
    </script>
</body>
</html>
"#;
