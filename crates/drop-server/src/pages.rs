//! Inline HTML for the login and drop pages

use drop_core::format_size;

/// Login page with an optional error or informational banner
pub fn login_page(error: Option<&str>, notice: Option<&str>) -> String {
    let banner = match (error, notice) {
        (Some(e), _) => format!(r#"<div class="status error">{}</div>"#, html_escape(e)),
        (None, Some(n)) => format!(r#"<div class="status success">{}</div>"#, html_escape(n)),
        (None, None) => String::new(),
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Login - Shared Drop</title>
    <style>{}</style>
</head>
<body>
    <div class="container narrow">
        <h1>Shared Drop</h1>
        <p>Enter the shared password to continue.</p>
        {}
        <form method="post" action="/login">
            <div class="field">
                <label for="password">Password</label>
                <input type="password" id="password" name="password" required autofocus>
            </div>
            <button type="submit">Log in</button>
        </form>
    </div>
</body>
</html>"#,
        CSS_STYLES, banner
    )
}

/// Main page: upload form, file table and the shared text box
pub fn index_page(max_upload_bytes: u64) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Shared Drop</title>
    <style>{}</style>
</head>
<body>
    <div class="container">
        <div class="header">
            <h1>Shared Drop</h1>
            <form method="post" action="/logout"><button type="submit" class="link">Log out</button></form>
        </div>

        <form id="upload-form">
            <div class="field drop-zone" id="drop-zone">
                <label for="file">Upload a file (max {}), or drop it here</label>
                <input type="file" id="file" name="file" required>
                <div id="selected" class="selected hidden">
                    <span id="selected-name"></span>
                    <button type="button" id="clear-btn" class="link">Clear</button>
                </div>
            </div>
            <button type="submit" id="upload-btn">Upload</button>
        </form>

        <h2>Files <button type="button" id="refresh-btn" class="link">Refresh</button></h2>
        <table>
            <thead><tr><th>Name</th><th>Size</th><th>Modified</th><th></th></tr></thead>
            <tbody id="file-list"></tbody>
        </table>

        <h2>Shared text</h2>
        <form id="text-form">
            <textarea id="content" name="content" rows="6"></textarea>
            <button type="submit">Share text</button>
        </form>

    </div>
    <div id="toasts" class="toasts"></div>

    <script>
    const MAX_UPLOAD_BYTES = {};
    {}
    </script>
</body>
</html>"#,
        CSS_STYLES,
        format_size(max_upload_bytes),
        max_upload_bytes,
        INDEX_JS
    )
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

const INDEX_JS: &str = r#"
function showStatus(message, kind) {
    const toast = document.createElement('div');
    toast.className = 'status ' + kind;
    toast.textContent = message;
    document.getElementById('toasts').appendChild(toast);
    setTimeout(() => toast.remove(), 4000);
}

function showSelection() {
    const input = document.getElementById('file');
    const selected = document.getElementById('selected');
    if (input.files.length === 0) {
        selected.className = 'selected hidden';
        return;
    }
    document.getElementById('selected-name').textContent = input.files[0].name;
    selected.className = 'selected';
}

async function handle(response) {
    if (response.status === 401) {
        window.location = '/login';
        throw new Error('Not logged in');
    }
    const body = await response.json();
    if (!body.success) {
        throw new Error(body.message);
    }
    return body;
}

async function refreshFiles() {
    const body = await handle(await fetch('/files'));
    const list = document.getElementById('file-list');
    list.replaceChildren();
    for (const file of body.files) {
        const row = document.createElement('tr');

        const name = document.createElement('td');
        const link = document.createElement('a');
        link.href = '/download/' + encodeURIComponent(file.name);
        link.textContent = file.name;
        name.appendChild(link);

        const size = document.createElement('td');
        size.textContent = file.size_display;
        const modified = document.createElement('td');
        modified.textContent = file.modified_display;

        const actions = document.createElement('td');
        const del = document.createElement('button');
        del.type = 'button';
        del.className = 'link danger';
        del.textContent = 'Delete';
        del.addEventListener('click', () => deleteFile(file.name));
        actions.appendChild(del);

        row.append(name, size, modified, actions);
        list.appendChild(row);
    }
}

async function deleteFile(name) {
    if (!confirm('Delete ' + name + '?')) {
        return;
    }
    try {
        const body = await handle(await fetch('/delete/' + encodeURIComponent(name), { method: 'POST' }));
        showStatus(body.message, 'success');
        await refreshFiles();
    } catch (e) {
        showStatus(e.message, 'error');
    }
}

async function loadText() {
    const body = await handle(await fetch('/get_text'));
    document.getElementById('content').value = body.content;
}

document.getElementById('upload-form').addEventListener('submit', async (e) => {
    e.preventDefault();
    const input = document.getElementById('file');
    const file = input.files[0];
    if (!file) {
        showStatus('Please choose a file first', 'error');
        return;
    }
    if (file.size > MAX_UPLOAD_BYTES) {
        showStatus('File is larger than the upload limit', 'error');
        return;
    }
    const data = new FormData();
    data.append('file', file);
    const button = document.getElementById('upload-btn');
    button.disabled = true;
    button.textContent = 'Uploading...';
    try {
        const body = await handle(await fetch('/upload', { method: 'POST', body: data }));
        showStatus(body.message, 'success');
        input.value = '';
        showSelection();
        await refreshFiles();
    } catch (e) {
        showStatus(e.message, 'error');
    } finally {
        button.disabled = false;
        button.textContent = 'Upload';
    }
});

document.getElementById('file').addEventListener('change', showSelection);

document.getElementById('clear-btn').addEventListener('click', () => {
    document.getElementById('file').value = '';
    showSelection();
});

const dropZone = document.getElementById('drop-zone');
['dragenter', 'dragover'].forEach((type) => dropZone.addEventListener(type, (e) => {
    e.preventDefault();
    dropZone.classList.add('dragging');
}));
['dragleave', 'drop'].forEach((type) => dropZone.addEventListener(type, (e) => {
    e.preventDefault();
    dropZone.classList.remove('dragging');
}));
dropZone.addEventListener('drop', (e) => {
    if (e.dataTransfer.files.length > 0) {
        document.getElementById('file').files = e.dataTransfer.files;
        showSelection();
    }
});

document.getElementById('text-form').addEventListener('submit', async (e) => {
    e.preventDefault();
    const content = document.getElementById('content').value;
    try {
        const body = await handle(await fetch('/share_text', {
            method: 'POST',
            body: new URLSearchParams({ content }),
        }));
        showStatus(body.message, 'success');
    } catch (e) {
        showStatus(e.message, 'error');
    }
});

document.getElementById('refresh-btn').addEventListener('click', () => {
    refreshFiles().catch((e) => showStatus(e.message, 'error'));
});

refreshFiles().catch((e) => showStatus(e.message, 'error'));
loadText().catch((e) => showStatus(e.message, 'error'));
"#;

const CSS_STYLES: &str = r#"
* {
    box-sizing: border-box;
}
body {
    font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, sans-serif;
    background: #1a1a2e;
    color: #eee;
    margin: 0;
    padding: 20px;
    display: flex;
    justify-content: center;
}
.container {
    background: #16213e;
    padding: 40px;
    border-radius: 12px;
    max-width: 800px;
    width: 100%;
    box-shadow: 0 4px 20px rgba(0,0,0,0.3);
}
.container.narrow {
    max-width: 400px;
    margin-top: 10vh;
}
.header {
    display: flex;
    justify-content: space-between;
    align-items: center;
}
h1 {
    margin: 0 0 10px 0;
    color: #fff;
    font-size: 24px;
}
h2 {
    margin: 30px 0 10px 0;
    font-size: 18px;
}
p {
    color: #aaa;
    margin: 0 0 20px 0;
}
.field {
    margin-bottom: 20px;
}
label {
    display: block;
    margin-bottom: 8px;
    color: #ddd;
    font-size: 14px;
}
input, textarea {
    width: 100%;
    padding: 12px;
    border: 1px solid #333;
    border-radius: 6px;
    background: #0f0f23;
    color: #fff;
    font-size: 16px;
}
textarea {
    margin-bottom: 12px;
    font-family: inherit;
}
button {
    padding: 12px 20px;
    background: #4f46e5;
    color: #fff;
    border: none;
    border-radius: 6px;
    font-size: 16px;
    cursor: pointer;
}
button:disabled {
    background: #333;
    cursor: not-allowed;
}
button.link {
    background: none;
    padding: 0 6px;
    color: #93c5fd;
    font-size: 14px;
}
button.link.danger {
    color: #fca5a5;
}
table {
    width: 100%;
    border-collapse: collapse;
    font-size: 14px;
}
th, td {
    text-align: left;
    padding: 8px;
    border-bottom: 1px solid #333;
}
a {
    color: #93c5fd;
}
.status {
    margin: 20px 0 0 0;
    padding: 12px;
    border-radius: 6px;
    font-size: 14px;
}
.hidden {
    display: none;
}
.drop-zone {
    padding: 16px;
    border: 2px dashed #333;
    border-radius: 8px;
}
.drop-zone.dragging {
    border-color: #4f46e5;
    background: #1e1b4b;
}
.selected {
    margin-top: 8px;
    font-size: 14px;
}
.toasts {
    position: fixed;
    top: 20px;
    right: 20px;
    max-width: 320px;
}
.toasts .status {
    margin: 0 0 8px 0;
}
.status.error {
    background: #7f1d1d;
    color: #fca5a5;
}
.status.success {
    background: #14532d;
    color: #86efac;
}
"#;
