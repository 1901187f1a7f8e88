//! Role-gated pages. Everything else under `public/` is served by the
//! static file service without any gate.

use std::path::Path;

use actix_files::NamedFile;

use crate::error::ApiError;
use crate::models::Role;
use crate::session::{require_login, require_role, Session};

pub async fn buy_page(session: Session) -> Result<NamedFile, ApiError> {
    let user = require_login(&session)?;
    require_role(user, Role::Customer)?;
    open_page("buy.html")
}

pub async fn manage_page(session: Session) -> Result<NamedFile, ApiError> {
    let user = require_login(&session)?;
    require_role(user, Role::Admin)?;
    open_page("manage.html")
}

fn open_page(name: &str) -> Result<NamedFile, ApiError> {
    NamedFile::open(Path::new("public").join(name)).map_err(|_| ApiError::NotFound)
}
