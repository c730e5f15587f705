//! Route handlers. Each takes the shared [`App`] and the request.

use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;

use super::App;
use super::forms::{Form, SnippetCreateForm, UserLoginForm, UserSignupForm};
use super::helpers::{client_error, not_found, render, server_error};
use crate::models::{ModelError, Snippet};
use crate::request::Request;
use crate::response::{ContentType, Response};
use crate::status::Status;

#[derive(Serialize)]
struct HomeView {
    snippets: Vec<Snippet>,
}

#[derive(Serialize)]
struct LoginView {
    authenticated_user_id: u64,
}

pub async fn home(app: Arc<App>, _req: Request) -> Response {
    match app.snippets.latest() {
        Ok(snippets) => render(Status::Ok, &HomeView { snippets }),
        Err(e) => server_error(e),
    }
}

pub async fn snippet_view(app: Arc<App>, req: Request) -> Response {
    let Some(id) = req.param("id").and_then(|id| id.parse::<u64>().ok()).filter(|id| *id >= 1) else {
        return not_found();
    };

    match app.snippets.get(id) {
        Ok(snippet) => render(Status::Ok, &snippet),
        Err(ModelError::NoRecord) => not_found(),
        Err(e) => server_error(e),
    }
}

pub async fn snippet_create(_app: Arc<App>, _req: Request) -> Response {
    render(Status::Ok, &SnippetCreateForm::default())
}

pub async fn snippet_create_post(app: Arc<App>, req: Request) -> Response {
    let Some(form) = Form::from_request(&req) else {
        return client_error(Status::UnsupportedMediaType);
    };
    let Some(mut form) = SnippetCreateForm::decode(&form) else {
        return client_error(Status::BadRequest);
    };
    if !form.validate() {
        return render(Status::UnprocessableContent, &form);
    }

    match app.snippets.insert(&form.title, &form.content, form.expires) {
        Ok(id) => Response::redirect(Status::SeeOther, &format!("/snippet/view/{id}")),
        Err(e) => server_error(e),
    }
}

pub async fn user_signup(_app: Arc<App>, _req: Request) -> Response {
    render(Status::Ok, &UserSignupForm::default())
}

pub async fn user_signup_post(app: Arc<App>, req: Request) -> Response {
    let Some(form) = Form::from_request(&req) else {
        return client_error(Status::UnsupportedMediaType);
    };
    let mut form = UserSignupForm::decode(&form);
    if !form.validate() {
        return render(Status::UnprocessableContent, &form);
    }

    let users = Arc::clone(&app.users);
    let (name, email, password) = (form.name.clone(), form.email.clone(), form.password.clone());
    match tokio::task::spawn_blocking(move || users.insert(&name, &email, &password)).await {
        Ok(Ok(())) => Response::redirect(Status::SeeOther, "/user/login"),
        Ok(Err(ModelError::DuplicateEmail)) => {
            form.validator.add_field_error("email", "Email address is already in use");
            render(Status::UnprocessableContent, &form)
        }
        Ok(Err(e)) => server_error(e),
        Err(e) => server_error(e),
    }
}

pub async fn user_login(_app: Arc<App>, _req: Request) -> Response {
    render(Status::Ok, &UserLoginForm::default())
}

pub async fn user_login_post(app: Arc<App>, req: Request) -> Response {
    let Some(form) = Form::from_request(&req) else {
        return client_error(Status::UnsupportedMediaType);
    };
    let mut form = UserLoginForm::decode(&form);
    if !form.validate() {
        return render(Status::UnprocessableContent, &form);
    }

    let users = Arc::clone(&app.users);
    let (email, password) = (form.email.clone(), form.password.clone());
    match tokio::task::spawn_blocking(move || users.authenticate(&email, &password)).await {
        Ok(Ok(id)) => render(Status::Ok, &LoginView { authenticated_user_id: id }),
        Ok(Err(ModelError::InvalidCredentials)) => {
            form.validator.add_non_field_error("Email or password is incorrect");
            render(Status::UnprocessableContent, &form)
        }
        Ok(Err(e)) => server_error(e),
        Err(e) => server_error(e),
    }
}

/// Serves a file from the static directory. Directories, missing files and
/// any path that tries to leave the directory are all `404`.
pub async fn static_file(app: Arc<App>, req: Request) -> Response {
    let Some(path) = req.param("filepath").and_then(|rel| confine(&app.static_dir, rel)) else {
        return not_found();
    };

    match tokio::fs::metadata(&path).await {
        Ok(meta) if meta.is_file() => {}
        Ok(_) => return not_found(),
        Err(e) if e.kind() == ErrorKind::NotFound => return not_found(),
        Err(e) => return server_error(e),
    }

    match tokio::fs::read(&path).await {
        Ok(bytes) => {
            let content_type = path
                .extension()
                .and_then(|ext| ext.to_str())
                .map_or(ContentType::OctetStream, ContentType::from_extension);
            Response::builder().bytes(content_type, bytes)
        }
        Err(e) => server_error(e),
    }
}

pub async fn not_found_handler(_req: Request) -> Response {
    not_found()
}

/// Joins `rel` onto `root`, refusing anything but plain path segments.
fn confine(root: &Path, rel: &str) -> Option<PathBuf> {
    let mut path = root.to_path_buf();
    let mut segments = 0;
    for component in Path::new(rel).components() {
        match component {
            Component::Normal(part) => path.push(part),
            Component::CurDir => continue,
            _ => return None,
        }
        segments += 1;
    }
    (segments > 0).then_some(path)
}
