//! # plumbdir
//!
//! Server and CLI over a read-only plumber directory.
//!
//! - [`api`] serves the directory as JSON plus `sitemap.xml` / `robots.txt`
//! - [`cli`] exposes the same lookups and SEO builders from the terminal
//! - [`config`] reads `plumbdir.toml` and `PLUMBDIR_*` overrides
//! - [`pages`] builds per-page metadata shared by both surfaces

pub mod api;
pub mod cli;
pub mod config;
pub mod pages;
