//! # Folio
//!
//! A static site generator and contact relay for personal portfolios.
//! Three JSON documents describe the owner, their projects and their posts;
//! folio turns them into a landing page plus deep-linkable project, tag and
//! blog pages, and runs a tiny server that forwards the contact form.
//!
//! # Architecture
//!
//! ```text
//! content/*.json ──► ContentStore ──► generate ──► dist/
//!                         │                          ▲
//! config.toml ──► SiteConfig ─┴──► backdrop (SVG) ───┘
//!
//! browser ── POST /api/contact ──► contact::Relay ──► email API | form relay | log
//! ```
//!
//! Content is loaded and validated once. Rendering never fails on content
//! shape: everything a template could trip over is rejected at load time.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`content`] | Loads and validates `profile.json`, `projects.json`, `posts.json`; read-only lookups |
//! | [`generate`] | Renders the site with Maud: landing sections, detail pages, tag pages, 404 |
//! | [`backdrop`] | Particle field simulation and its SVG still for the hero |
//! | [`contact`] | Submission validation, delivery channel selection, and the axum endpoint |
//! | [`config`] | `config.toml` loading, validation, merging, and theme CSS generation |
//! | [`types`] | Content records shared by every module (`SiteProfile`, `Project`, `Post`) |
//! | [`naming`] | Slug validation, tag slugs, read-time estimates |
//! | [`logging`] | `tracing` subscriber setup |
//! | [`output`] | CLI output formatting for `check` and `build` |
//!
//! # Design Decisions
//!
//! ## Maud Over Template Engines
//!
//! HTML is generated with [Maud](https://maud.lambda.xyz/), a compile-time HTML
//! macro system. Malformed markup is a build error, template variables are Rust
//! expressions, and all interpolation is auto-escaped.
//!
//! ## Motion Without a Runtime
//!
//! The only JavaScript shipped is the contact form submit handler. The hero's
//! particle field is simulated at build time from a fixed seed and embedded as
//! SVG, so every build of the same content is byte-identical. Marquee,
//! typewriter and scroll progress are pure CSS and honor
//! `prefers-reduced-motion`.
//!
//! ## Relay, Not Mailbox
//!
//! The contact endpoint validates, forwards once and forgets. Which channel it
//! uses is read from the environment per request, so credentials never touch
//! `config.toml` or the generated site.

pub mod backdrop;
pub mod config;
pub mod contact;
pub mod content;
pub mod generate;
pub mod logging;
pub mod naming;
pub mod output;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
