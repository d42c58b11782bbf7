//! Inline-HTML page rendering
//!
//! The presentation layer is deliberately thin: one function per page,
//! rendering server-side HTML with base-path-aware links. No client-side
//! framework.

use crate::models::{i64_field, str_field};
use crate::store::Record;

/// Escape text for interpolation into HTML
pub fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

fn layout(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{} - Taskdeck</title>
<meta name="viewport" content="width=device-width, initial-scale=1">
</head>
<body>
{}
</body>
</html>"#,
        escape(title),
        body
    )
}

/// Login screen, optionally with an error banner
pub fn login_page(base: &str, error: Option<&str>) -> String {
    let banner = match error {
        Some(message) => format!("<p class=\"error\">{}</p>\n", escape(message)),
        None => String::new(),
    };

    layout(
        "Login",
        &format!(
            r#"<h1>Sign in</h1>
{}<form method="post" action="{}/auth/login">
  <label>E-mail <input type="email" name="email"></label>
  <label>Password <input type="password" name="password"></label>
  <button type="submit">Sign in</button>
</form>"#,
            banner, base
        ),
    )
}

/// Dashboard home
pub fn dashboard_page(base: &str, user_name: &str) -> String {
    layout(
        "Dashboard",
        &format!(
            r#"<h1>Welcome, {}</h1>
<nav>
  <a href="{base}/dashboard/users">Users</a>
  <a href="{base}/tasks/kanban">Task board</a>
  <a href="{base}/auth/logout">Log out</a>
</nav>"#,
            escape(user_name),
            base = base
        ),
    )
}

/// User administration listing with create/edit/delete forms
pub fn users_page(base: &str, users: &[Record]) -> String {
    let mut rows = String::new();
    for user in users {
        let id = user.get("id").and_then(|v| v.as_u64()).unwrap_or(0);
        rows.push_str(&format!(
            r#"<tr>
  <td>{id}</td><td>{name}</td><td>{email}</td><td>{role}</td>
  <td>
    <form method="post" action="{base}/dashboard/user/edit">
      <input type="hidden" name="id" value="{id}">
      <input name="name" value="{name}"><input name="email" value="{email}">
      <input type="password" name="password" placeholder="unchanged">
      <select name="role"><option>user</option><option>admin</option></select>
      <button type="submit">Save</button>
    </form>
    <form method="post" action="{base}/dashboard/user/delete">
      <input type="hidden" name="id" value="{id}">
      <button type="submit">Delete</button>
    </form>
  </td>
</tr>
"#,
            id = id,
            name = escape(str_field(user, "name")),
            email = escape(str_field(user, "email")),
            role = escape(str_field(user, "role")),
            base = base
        ));
    }

    layout(
        "Users",
        &format!(
            r#"<h1>Users</h1>
<p><a href="{base}/dashboard">Back to dashboard</a></p>
<table>
<tr><th>ID</th><th>Name</th><th>E-mail</th><th>Role</th><th></th></tr>
{rows}</table>
<h2>New user</h2>
<form method="post" action="{base}/dashboard/user/create">
  <input name="name" placeholder="Name">
  <input name="email" placeholder="E-mail">
  <input type="password" name="password" placeholder="Password">
  <select name="role"><option>user</option><option>admin</option></select>
  <button type="submit">Create</button>
</form>"#,
            base = base,
            rows = rows
        ),
    )
}

/// Kanban board: one column per status
pub fn kanban_page(base: &str, tasks: &[Record]) -> String {
    let mut columns = String::new();
    for (status, heading) in [
        ("todo", "To do"),
        ("in_progress", "In progress"),
        ("done", "Done"),
    ] {
        let mut cards = String::new();
        for task in tasks.iter().filter(|t| str_field(t, "status") == status) {
            cards.push_str(&format!(
                r#"  <li data-id="{}" data-position="{}"><strong>{}</strong> {}</li>
"#,
                task.get("id").and_then(|v| v.as_u64()).unwrap_or(0),
                i64_field(task, "position"),
                escape(str_field(task, "title")),
                escape(str_field(task, "description")),
            ));
        }
        columns.push_str(&format!(
            "<section data-status=\"{}\"><h2>{}</h2>\n<ul>\n{}</ul>\n</section>\n",
            status, heading, cards
        ));
    }

    layout(
        "Task board",
        &format!(
            r#"<h1>Task board</h1>
<p><a href="{base}/dashboard">Back to dashboard</a></p>
{columns}<h2>New task</h2>
<form method="post" action="{base}/tasks/create">
  <input name="title" placeholder="Title">
  <input name="description" placeholder="Description">
  <button type="submit">Add task</button>
</form>"#,
            base = base,
            columns = columns
        ),
    )
}

/// Terminal 404 page
pub fn not_found_page(base: &str) -> String {
    let home = if base.is_empty() { "/" } else { base };
    format!(
        r#"<h1>404 - Page Not Found</h1>
<p>The requested page could not be found.</p>
<p><a href="{}">Go back to home</a></p>"#,
        home
    )
}

/// Plain 500 page for storage failures
pub fn error_page() -> String {
    layout(
        "Error",
        "<h1>Something went wrong</h1>\n<p>The change could not be saved. Please try again.</p>",
    )
}
