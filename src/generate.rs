//! HTML site generation.
//!
//! Renders the content store into a static site. The landing page is a
//! configured, ordered list of sections; every project, post and project tag
//! also gets its own deep-linkable page.
//!
//! ## Output Structure
//!
//! ```text
//! dist/
//! ├── index.html                        # Landing page (sections per [layout])
//! ├── 404.html
//! ├── resume.pdf                        # Copied from content/assets/
//! ├── assets/
//! │   └── site.3f9a1c0b2e.css           # Theme + base styles, content-hashed
//! ├── projects/
//! │   ├── index.html                    # All projects + tag index
//! │   ├── atlas/index.html              # Project detail
//! │   └── tags/
//! │       └── rust/index.html           # Projects tagged "Rust"
//! └── blog/
//!     ├── index.html                    # All posts, newest first
//!     └── edge-caching/index.html       # Post detail
//! ```
//!
//! ## CSS and JavaScript
//!
//! Static assets are embedded at compile time:
//! - `static/style.css`: base styles and the CSS-only effects (marquee,
//!   typewriter, scroll progress bar); theme variables are prepended from config
//! - `static/contact.js`: posts the contact form as JSON and disables the
//!   submit button while the request is in flight
//!
//! The particle backdrop is simulated here, at build time, and embedded as SVG.
//!
//! ## HTML Generation
//!
//! Uses [maud](https://maud.lambda.xyz/) for compile-time HTML templating.
//! All interpolation is escaped; only rendered markdown and the backdrop SVG
//! are inserted pre-escaped.

use crate::backdrop;
use crate::config::{self, Section, SiteConfig, ThemeMode};
use crate::content::ContentStore;
use crate::naming::slugify;
use crate::types::{Post, Project, SiteProfile, Stat};
use maud::{DOCTYPE, Markup, PreEscaped, html};
use pulldown_cmark::{Options, Parser, html as md_html};
use rayon::prelude::*;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::Path;
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Asset walk error: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("Asset path error: {0}")]
    AssetPath(#[from] std::path::StripPrefixError),
}

const CSS_STATIC: &str = include_str!("../static/style.css");
const CONTACT_JS: &str = include_str!("../static/contact.js");

/// What kind of page a generated file is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageKind {
    Home,
    ProjectIndex,
    Project,
    Tag,
    BlogIndex,
    Post,
    NotFound,
}

/// One written page, for the CLI summary.
#[derive(Debug, Clone)]
pub struct GeneratedPage {
    pub kind: PageKind,
    pub title: String,
    /// Output-relative path, e.g. `projects/atlas/index.html`
    pub path: String,
}

#[derive(Debug, Clone, Default)]
pub struct GenerateReport {
    pub pages: Vec<GeneratedPage>,
    /// Output-relative stylesheet path
    pub stylesheet: String,
    pub assets_copied: usize,
}

impl GenerateReport {
    pub fn count(&self, kind: PageKind) -> usize {
        self.pages.iter().filter(|p| p.kind == kind).count()
    }
}

struct RenderedPage {
    page: GeneratedPage,
    html: Markup,
}

/// Everything a template needs besides the record it renders.
///
/// The theme travels here as an owned config value; templates never consult
/// global state.
struct RenderContext<'a> {
    config: &'a SiteConfig,
    profile: &'a SiteProfile,
    store: &'a ContentStore,
    /// Absolute href of the hashed stylesheet
    stylesheet: String,
    backdrop: Option<Markup>,
}

/// Render the whole site into `output_dir`.
///
/// Output from an earlier build is pruned first: the `projects/` and `blog/`
/// trees and any previous hashed stylesheet are removed, so renamed or deleted
/// records leave no pages behind. Anything else in `output_dir` is untouched.
/// `source_dir` is the content root; its assets directory is then copied to
/// the output root so generated pages win on any path collision.
pub fn generate(
    store: &ContentStore,
    config: &SiteConfig,
    source_dir: &Path,
    output_dir: &Path,
) -> Result<GenerateReport, GenerateError> {
    fs::create_dir_all(output_dir)?;
    prune_generated(output_dir)?;

    let assets_copied = copy_assets(&source_dir.join(&config.site.assets_dir), output_dir)?;

    let css = format!("{}\n\n{}", config::generate_theme_css(&config.theme), CSS_STATIC);
    let stylesheet = format!("assets/site.{}.css", content_hash(&css));
    fs::create_dir_all(output_dir.join("assets"))?;
    fs::write(output_dir.join(&stylesheet), &css)?;

    let ctx = RenderContext {
        config,
        profile: store.site_profile(),
        store,
        stylesheet: format!("/{stylesheet}"),
        backdrop: backdrop::render_still(&config.backdrop),
    };

    let mut pages = vec![
        render_home(&ctx),
        render_project_index(&ctx),
        render_blog_index(&ctx),
        render_not_found(&ctx),
    ];

    let projects: Vec<RenderedPage> = store
        .all_projects()
        .par_iter()
        .map(|p| render_project_page(&ctx, p))
        .collect();
    let tags: Vec<RenderedPage> = store
        .all_tags()
        .par_iter()
        .map(|t| render_tag_page(&ctx, t))
        .collect();
    let posts: Vec<RenderedPage> = store
        .posts_by_date_desc()
        .par_iter()
        .map(|p| render_post_page(&ctx, p))
        .collect();
    pages.extend(projects);
    pages.extend(tags);
    pages.extend(posts);

    let mut report = GenerateReport {
        pages: Vec::with_capacity(pages.len()),
        stylesheet,
        assets_copied,
    };
    for rendered in pages {
        let path = output_dir.join(&rendered.page.path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, rendered.html.into_string())?;
        report.pages.push(rendered.page);
    }
    Ok(report)
}

/// Remove the page trees and stylesheets a previous build wrote.
fn prune_generated(output_dir: &Path) -> Result<(), GenerateError> {
    for tree in ["projects", "blog"] {
        let dir = output_dir.join(tree);
        if dir.is_dir() {
            fs::remove_dir_all(&dir)?;
        }
    }
    let assets = output_dir.join("assets");
    if !assets.is_dir() {
        return Ok(());
    }
    for entry in fs::read_dir(&assets)? {
        let entry = entry?;
        let name = entry.file_name();
        let name = name.to_string_lossy();
        if name.starts_with("site.") && name.ends_with(".css") && entry.path().is_file() {
            fs::remove_file(entry.path())?;
        }
    }
    Ok(())
}

/// First ten hex digits of the SHA-256 of `content`.
fn content_hash(content: &str) -> String {
    let digest = Sha256::digest(content.as_bytes());
    digest.iter().take(5).map(|b| format!("{b:02x}")).collect()
}

/// Copy `src` recursively into `dst`, skipping dotfiles. Missing `src` is fine.
fn copy_assets(src: &Path, dst: &Path) -> Result<usize, GenerateError> {
    if !src.is_dir() {
        return Ok(0);
    }
    let mut copied = 0;
    let walker = WalkDir::new(src)
        .min_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !e.file_name().to_string_lossy().starts_with('.'));
    for entry in walker {
        let entry = entry?;
        let target = dst.join(entry.path().strip_prefix(src)?);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)?;
        } else {
            fs::copy(entry.path(), &target)?;
            copied += 1;
        }
    }
    Ok(copied)
}

fn render_markdown(source: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_FOOTNOTES);
    let mut out = String::new();
    md_html::push_html(&mut out, Parser::new_ext(source, options));
    out
}

fn absolute_url(ctx: &RenderContext, url: &str) -> String {
    format!("{}{}", ctx.config.site.base_url.trim_end_matches('/'), url)
}

fn project_url(project: &Project) -> String {
    format!("/projects/{}/", project.slug)
}

fn post_url(post: &Post) -> String {
    format!("/blog/{}/", post.slug)
}

fn tag_url(tag: &str) -> String {
    format!("/projects/tags/{}/", slugify(tag))
}

// ============================================================================
// HTML Components
// ============================================================================

/// Renders the base HTML document structure
fn base_document(
    ctx: &RenderContext,
    url: &str,
    title: &str,
    description: &str,
    body_class: Option<&str>,
    content: Markup,
) -> Markup {
    let color_scheme = match ctx.config.theme.mode {
        ThemeMode::System => "light dark",
        ThemeMode::Light => "light",
        ThemeMode::Dark => "dark",
    };
    html! {
        (DOCTYPE)
        html lang=(ctx.config.site.language) {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                meta name="color-scheme" content=(color_scheme);
                @if !description.is_empty() {
                    meta name="description" content=(description);
                }
                meta property="og:title" content=(title);
                @if !ctx.config.site.base_url.is_empty() {
                    link rel="canonical" href=(absolute_url(ctx, url));
                }
                title { (title) }
                link rel="stylesheet" href=(ctx.stylesheet);
            }
            body class=[body_class] {
                div.scroll-progress aria-hidden="true" {}
                (site_header(ctx))
                (content)
                (site_footer(ctx.profile))
            }
        }
    }
}

/// Page title with the owner's name appended.
fn page_title(ctx: &RenderContext, title: &str) -> String {
    format!("{} · {}", title, ctx.profile.name)
}

/// Site header: name on the left, section anchors and page links on the right
fn site_header(ctx: &RenderContext) -> Markup {
    let sections = &ctx.config.layout.sections;
    let has = |s: Section| sections.contains(&s);
    html! {
        header.site-header {
            a.brand href="/" { (ctx.profile.name) }
            nav.site-nav {
                ul {
                    @if has(Section::About) {
                        li { a href="/#about" { "About" } }
                    }
                    @if has(Section::Experience) && !ctx.profile.experience.is_empty() {
                        li { a href="/#experience" { "Experience" } }
                    }
                    li { a href="/projects/" { "Projects" } }
                    @if !ctx.store.posts_by_date_desc().is_empty() {
                        li { a href="/blog/" { "Blog" } }
                    }
                    @if has(Section::Contact) {
                        li { a href="/#contact" { "Contact" } }
                    }
                    li { a.resume-link href=(ctx.config.site.resume_path) download { "Resume" } }
                }
            }
        }
    }
}

fn site_footer(profile: &SiteProfile) -> Markup {
    html! {
        footer.site-footer {
            p { "© " (profile.name) }
            @if !profile.socials.is_empty() {
                ul.socials {
                    @for social in &profile.socials {
                        li { a href=(social.url) target="_blank" rel="noopener" { (social.label) } }
                    }
                }
            }
        }
    }
}

/// Horizontally scrolling strip. The track is rendered twice so the CSS
/// animation can loop without a visible seam.
fn marquee(class: &str, items: &[String]) -> Markup {
    html! {
        div class={ "marquee " (class) } {
            @for copy in 0..2 {
                ul.marquee-track aria-hidden=[(copy == 1).then_some("true")] {
                    @for item in items {
                        li { (item) }
                    }
                }
            }
        }
    }
}

fn stat_list(class: &str, stats: &[Stat]) -> Markup {
    html! {
        dl class=(class) {
            @for stat in stats {
                div.stat {
                    dt { (stat.label) }
                    dd { (stat.value) }
                }
            }
        }
    }
}

fn tag_links(tags: &[String]) -> Markup {
    html! {
        ul.tags {
            @for tag in tags {
                li { a href=(tag_url(tag)) { (tag) } }
            }
        }
    }
}

fn project_card(project: &Project) -> Markup {
    html! {
        article.project-card.featured[project.featured] {
            a.card-link href=(project_url(project)) {
                img src=(project.cover_image) alt=(project.title) loading="lazy";
                h3 { (project.title) }
            }
            p { (project.short_description) }
            (tag_links(&project.tags))
        }
    }
}

fn post_card(post: &Post) -> Markup {
    html! {
        article.post-card {
            a.card-link href=(post_url(post)) {
                h3 { (post.title) }
            }
            p.post-meta {
                time datetime=(post.date.format("%Y-%m-%d").to_string()) { (post.date.format("%B %-d, %Y").to_string()) }
                " · " (post.read_minutes()) " min read"
            }
            p { (post.excerpt) }
        }
    }
}

// ============================================================================
// Landing page sections
// ============================================================================

fn render_section(ctx: &RenderContext, section: Section) -> Option<Markup> {
    match section {
        Section::Hero => Some(hero_section(ctx)),
        Section::About => Some(about_section(ctx.profile)),
        Section::Experience => experience_section(ctx.profile),
        Section::Projects => Some(projects_section(ctx)),
        Section::Blog => blog_section(ctx),
        Section::Contact => Some(contact_section(ctx)),
    }
}

fn hero_section(ctx: &RenderContext) -> Markup {
    let profile = ctx.profile;
    let lead = profile.hero_taglines.first();
    html! {
        section id="hero" class="hero" {
            @if let Some(svg) = &ctx.backdrop {
                (svg)
            }
            div.hero-content {
                p.eyebrow { "Hi, I'm" }
                h1 { (profile.name) }
                p.hero-title { (profile.title) }
                @if let Some(line) = lead {
                    p.typewriter style={ "--chars: " (line.chars().count()) } { (line) }
                }
                @if profile.hero_taglines.len() > 1 {
                    (marquee("taglines", &profile.hero_taglines[1..]))
                }
                div.hero-actions {
                    a.button href="#projects" { "View my work" }
                    a.button.secondary href=(ctx.config.site.resume_path) download { "Download resume" }
                }
            }
        }
    }
}

fn about_section(profile: &SiteProfile) -> Markup {
    html! {
        section id="about" class="about" {
            h2 { "About" }
            @if !profile.summary.is_empty() {
                p.lead { (profile.summary) }
            }
            @for paragraph in &profile.bio {
                p { (paragraph) }
            }
            @if !profile.badges.is_empty() {
                (marquee("badges", &profile.badges))
            }
            @if !profile.stats.is_empty() {
                (stat_list("stats", &profile.stats))
            }
        }
    }
}

fn experience_section(profile: &SiteProfile) -> Option<Markup> {
    if profile.experience.is_empty() {
        return None;
    }
    Some(html! {
        section id="experience" class="experience" {
            h2 { "Experience" }
            ol.timeline {
                @for job in &profile.experience {
                    li.job {
                        h3 { (job.role) " · " span.company { (job.company) } }
                        p.period { (job.period) }
                        @if !job.summary.is_empty() {
                            p { (job.summary) }
                        }
                        @if !job.highlights.is_empty() {
                            ul.highlights {
                                @for h in &job.highlights {
                                    li { (h) }
                                }
                            }
                        }
                    }
                }
            }
        }
    })
}

fn projects_section(ctx: &RenderContext) -> Markup {
    let tags = ctx.store.all_tags();
    html! {
        section id="projects" class="projects" {
            h2 { "Selected work" }
            @if !tags.is_empty() {
                nav.tag-filter aria-label="Filter projects by tag" {
                    (tag_links(&tags))
                }
            }
            div.project-grid {
                @for project in ctx.store.projects_featured_first() {
                    (project_card(project))
                }
            }
            a.more href="/projects/" { "All projects →" }
        }
    }
}

fn blog_section(ctx: &RenderContext) -> Option<Markup> {
    let posts = ctx.store.posts_by_date_desc();
    if posts.is_empty() {
        return None;
    }
    let latest = &posts[..posts.len().min(ctx.config.layout.latest_posts)];
    Some(html! {
        section id="blog" class="blog" {
            h2 { "Writing" }
            div.post-list {
                @for post in latest {
                    (post_card(post))
                }
            }
            a.more href="/blog/" { "All posts →" }
        }
    })
}

fn contact_section(ctx: &RenderContext) -> Markup {
    let email = &ctx.profile.contact.email;
    html! {
        section id="contact" class="contact" {
            h2 { "Get in touch" }
            p {
                "Have a project in mind? Send a message or email "
                a href={ "mailto:" (email) } { (email) } "."
            }
            @if let Some(location) = &ctx.profile.contact.location {
                p.location { (location) }
            }
            form #contact-form .contact-form method="post" action=(ctx.config.contact.endpoint) novalidate {
                label { "Name" input type="text" name="name" required autocomplete="name"; }
                label { "Email" input type="email" name="email" required autocomplete="email"; }
                label { "Subject" input type="text" name="subject"; }
                label {
                    "Budget"
                    select name="budget" {
                        option value="" { "Prefer not to say" }
                        option { "< $5k" }
                        option { "$5k – $20k" }
                        option { "$20k+" }
                    }
                }
                label { "Message" textarea name="message" rows="6" required {} }
                button type="submit" { "Send message" }
                p.form-status role="status" aria-live="polite" {}
            }
            script { (PreEscaped(CONTACT_JS)) }
        }
    }
}

// ============================================================================
// Page Renderers
// ============================================================================

/// Landing page: configured sections, top to bottom
fn render_home(ctx: &RenderContext) -> RenderedPage {
    let content = html! {
        main.home {
            @for section in &ctx.config.layout.sections {
                @if let Some(markup) = render_section(ctx, *section) {
                    (markup)
                }
            }
        }
    };
    let title = format!("{} · {}", ctx.profile.name, ctx.profile.title);
    RenderedPage {
        html: base_document(ctx, "/", &title, &ctx.profile.summary, Some("home"), content),
        page: GeneratedPage {
            kind: PageKind::Home,
            title,
            path: "index.html".to_string(),
        },
    }
}

fn render_project_index(ctx: &RenderContext) -> RenderedPage {
    let tags = ctx.store.all_tags();
    let content = html! {
        main.project-index {
            header.page-header {
                h1 { "Projects" }
            }
            @if !tags.is_empty() {
                nav.tag-filter aria-label="Filter projects by tag" {
                    ul.tags {
                        @for tag in &tags {
                            li {
                                a href=(tag_url(tag)) { (tag) }
                                " "
                                span.count { (ctx.store.projects_with_tag(tag).len()) }
                            }
                        }
                    }
                }
            }
            div.project-grid {
                @for project in ctx.store.projects_featured_first() {
                    (project_card(project))
                }
            }
        }
    };
    RenderedPage {
        html: base_document(ctx, "/projects/", &page_title(ctx, "Projects"), "", None, content),
        page: GeneratedPage {
            kind: PageKind::ProjectIndex,
            title: "Projects".to_string(),
            path: "projects/index.html".to_string(),
        },
    }
}

fn render_project_page(ctx: &RenderContext, project: &Project) -> RenderedPage {
    let narrative = [
        ("The challenge", &project.challenge),
        ("The solution", &project.solution),
        ("The outcome", &project.outcome),
    ];
    let content = html! {
        main.project-page {
            article {
                header.page-header {
                    p.breadcrumb { a href="/projects/" { "Projects" } " › " (project.title) }
                    h1 { (project.title) }
                    p.lead { (project.short_description) }
                    dl.project-facts {
                        div { dt { "Role" } dd { (project.role) } }
                        div { dt { "Timeline" } dd { (project.timeline) } }
                    }
                    @if project.demo_url.is_some() || project.repo_url.is_some() {
                        p.project-links {
                            @if let Some(url) = &project.demo_url {
                                a.button href=(url) target="_blank" rel="noopener" { "Live demo" }
                            }
                            @if let Some(url) = &project.repo_url {
                                a.button.secondary href=(url) target="_blank" rel="noopener" { "Source" }
                            }
                        }
                    }
                }
                img.cover src=(project.cover_image) alt=(project.title);
                section.overview {
                    @for paragraph in project.long_description.split("\n\n") {
                        p { (paragraph.trim()) }
                    }
                }
                @for (heading, text) in narrative {
                    @if let Some(text) = text {
                        section.narrative {
                            h2 { (heading) }
                            p { (text) }
                        }
                    }
                }
                @if !project.metrics.is_empty() {
                    (stat_list("metrics", &project.metrics))
                }
                @if !project.technologies.is_empty() {
                    section.technologies {
                        h2 { "Built with" }
                        ul {
                            @for tech in &project.technologies {
                                li { (tech) }
                            }
                        }
                    }
                }
                @if !project.images.is_empty() {
                    div.gallery {
                        @for (idx, src) in project.images.iter().enumerate() {
                            img src=(src) alt={ (project.title) " screenshot " (idx + 1) } loading="lazy";
                        }
                    }
                }
                (tag_links(&project.tags))
            }
        }
    };
    RenderedPage {
        html: base_document(
            ctx,
            &project_url(project),
            &page_title(ctx, &project.title),
            &project.short_description,
            Some("detail"),
            content,
        ),
        page: GeneratedPage {
            kind: PageKind::Project,
            title: project.title.clone(),
            path: format!("projects/{}/index.html", project.slug),
        },
    }
}

fn render_tag_page(ctx: &RenderContext, tag: &str) -> RenderedPage {
    let projects = ctx.store.projects_with_tag(tag);
    let content = html! {
        main.tag-page {
            header.page-header {
                p.breadcrumb { a href="/projects/" { "Projects" } " › " (tag) }
                h1 { "Projects tagged “" (tag) "”" }
            }
            div.project-grid {
                @for project in projects {
                    (project_card(project))
                }
            }
        }
    };
    RenderedPage {
        html: base_document(ctx, &tag_url(tag), &page_title(ctx, tag), "", None, content),
        page: GeneratedPage {
            kind: PageKind::Tag,
            title: tag.to_string(),
            path: format!("projects/tags/{}/index.html", slugify(tag)),
        },
    }
}

fn render_blog_index(ctx: &RenderContext) -> RenderedPage {
    let content = html! {
        main.blog-index {
            header.page-header {
                h1 { "Writing" }
            }
            @if ctx.store.posts_by_date_desc().is_empty() {
                p.empty { "Nothing here yet." }
            }
            div.post-list {
                @for post in ctx.store.posts_by_date_desc() {
                    (post_card(post))
                }
            }
        }
    };
    RenderedPage {
        html: base_document(ctx, "/blog/", &page_title(ctx, "Writing"), "", None, content),
        page: GeneratedPage {
            kind: PageKind::BlogIndex,
            title: "Writing".to_string(),
            path: "blog/index.html".to_string(),
        },
    }
}

fn render_post_page(ctx: &RenderContext, post: &Post) -> RenderedPage {
    let content = html! {
        main.post-page {
            article {
                header.page-header {
                    p.breadcrumb { a href="/blog/" { "Writing" } }
                    h1 { (post.title) }
                    p.post-meta {
                        time datetime=(post.date.format("%Y-%m-%d").to_string()) { (post.date.format("%B %-d, %Y").to_string()) }
                        " · " (post.read_minutes()) " min read"
                    }
                }
                img.cover src=(post.cover_image) alt=(post.title);
                div.prose {
                    (PreEscaped(render_markdown(&post.body)))
                }
                @if !post.tags.is_empty() {
                    ul.tags.plain {
                        @for tag in &post.tags {
                            li { (tag) }
                        }
                    }
                }
            }
        }
    };
    RenderedPage {
        html: base_document(
            ctx,
            &post_url(post),
            &page_title(ctx, &post.title),
            &post.excerpt,
            Some("detail"),
            content,
        ),
        page: GeneratedPage {
            kind: PageKind::Post,
            title: post.title.clone(),
            path: format!("blog/{}/index.html", post.slug),
        },
    }
}

fn render_not_found(ctx: &RenderContext) -> RenderedPage {
    let content = html! {
        main.not-found {
            h1 { "Page not found" }
            p { "The page you were looking for doesn't exist or has moved." }
            p {
                a.button href="/" { "Back home" }
                " "
                a.button.secondary href="/projects/" { "Browse projects" }
            }
        }
    };
    RenderedPage {
        html: base_document(ctx, "/404.html", &page_title(ctx, "Not found"), "", Some("not-found"), content),
        page: GeneratedPage {
            kind: PageKind::NotFound,
            title: "Not found".to_string(),
            path: "404.html".to_string(),
        },
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;
    use tempfile::TempDir;

    fn context<'a>(store: &'a ContentStore, config: &'a SiteConfig) -> RenderContext<'a> {
        RenderContext {
            config,
            profile: store.site_profile(),
            store,
            stylesheet: "/assets/site.test.css".to_string(),
            backdrop: None,
        }
    }

    fn section_ids(html: &str) -> Vec<&str> {
        html.match_indices("<section id=\"")
            .map(|(i, m)| {
                let rest = &html[i + m.len()..];
                &rest[..rest.find('"').unwrap()]
            })
            .collect()
    }

    #[test]
    fn home_renders_sections_in_configured_order() {
        let store = fixture_store();
        let mut config = SiteConfig::default();
        config.layout.sections = vec![Section::Contact, Section::Hero, Section::Projects];
        let html = render_home(&context(&store, &config)).html.into_string();
        assert_eq!(section_ids(&html), vec!["contact", "hero", "projects"]);
    }

    #[test]
    fn home_renders_every_default_section() {
        let store = fixture_store();
        let config = SiteConfig::default();
        let html = render_home(&context(&store, &config)).html.into_string();
        assert_eq!(
            section_ids(&html),
            vec!["hero", "about", "experience", "projects", "blog", "contact"]
        );
    }

    #[test]
    fn empty_experience_section_is_skipped() {
        let mut profile = profile();
        profile.experience.clear();
        let store = ContentStore::from_parts(profile, vec![], vec![]).unwrap();
        let config = SiteConfig::default();
        let html = render_home(&context(&store, &config)).html.into_string();
        let ids = section_ids(&html);
        assert!(!ids.contains(&"experience"));
        assert!(!ids.contains(&"blog"));
    }

    #[test]
    fn hero_includes_typewriter_and_resume() {
        let store = fixture_store();
        let config = SiteConfig::default();
        let html = hero_section(&context(&store, &config)).into_string();
        let first = &store.site_profile().hero_taglines[0];
        assert!(html.contains("typewriter"));
        assert!(html.contains(&format!("--chars: {}", first.chars().count())));
        assert!(html.contains(r#"href="/resume.pdf""#));
    }

    #[test]
    fn hero_embeds_backdrop_when_present() {
        let store = fixture_store();
        let config = SiteConfig::default();
        let mut ctx = context(&store, &config);
        ctx.backdrop = backdrop::render_still(&config.backdrop);
        let html = hero_section(&ctx).into_string();
        assert!(html.contains(r#"<svg xmlns="http://www.w3.org/2000/svg" class="backdrop""#));
    }

    #[test]
    fn marquee_duplicates_track_for_loop() {
        let items = vec!["Rust".to_string(), "TypeScript".to_string()];
        let html = marquee("badges", &items).into_string();
        assert_eq!(html.matches("marquee-track").count(), 2);
        assert_eq!(html.matches("aria-hidden=\"true\"").count(), 1);
        assert_eq!(html.matches("<li>Rust</li>").count(), 2);
    }

    #[test]
    fn blog_section_limits_to_latest_posts() {
        let store = fixture_store();
        let mut config = SiteConfig::default();
        config.layout.latest_posts = 2;
        let html = blog_section(&context(&store, &config))
            .unwrap()
            .into_string();
        assert_eq!(html.matches("post-card").count(), 2);
        let newest = &store.posts_by_date_desc()[0];
        assert!(html.contains(&newest.title));
    }

    #[test]
    fn contact_form_posts_to_configured_endpoint() {
        let store = fixture_store();
        let mut config = SiteConfig::default();
        config.contact.endpoint = "/relay".to_string();
        let html = contact_section(&context(&store, &config)).into_string();
        assert!(html.contains(r#"action="/relay""#));
        assert!(html.contains(r#"name="message""#));
        assert!(html.contains("mailto:jane@example.com"));
    }

    #[test]
    fn project_page_shows_narrative_and_links() {
        let store = fixture_store();
        let config = SiteConfig::default();
        let project = store.project_by_slug("atlas").unwrap();
        let page = render_project_page(&context(&store, &config), project);
        assert_eq!(page.page.path, "projects/atlas/index.html");
        let html = page.html.into_string();
        assert!(html.contains("The challenge"));
        assert!(html.contains("Live demo"));
        assert!(html.contains(r#"href="/projects/tags/rust/""#));
    }

    #[test]
    fn project_page_omits_absent_narrative() {
        let store = ContentStore::from_parts(profile(), vec![project("bare", &[])], vec![]).unwrap();
        let config = SiteConfig::default();
        let project = store.project_by_slug("bare").unwrap();
        let html = render_project_page(&context(&store, &config), project)
            .html
            .into_string();
        assert!(!html.contains("The challenge"));
        assert!(!html.contains("Live demo"));
    }

    #[test]
    fn post_page_renders_markdown() {
        let store = fixture_store();
        let config = SiteConfig::default();
        let post = &store.posts_by_date_desc()[0];
        let html = render_post_page(&context(&store, &config), post)
            .html
            .into_string();
        assert!(html.contains("<div class=\"prose\">"));
        assert!(html.contains("min read"));
    }

    #[test]
    fn markdown_supports_emphasis_and_tables() {
        let html = render_markdown("**bold** and *it*\n\n| a | b |\n|---|---|\n| 1 | 2 |\n");
        assert!(html.contains("<strong>bold</strong>"));
        assert!(html.contains("<em>it</em>"));
        assert!(html.contains("<table>"));
    }

    #[test]
    fn tag_page_lists_only_tagged_projects() {
        let store = ContentStore::from_parts(
            profile(),
            vec![project("a", &["Web Audio"]), project("b", &["Rust"])],
            vec![],
        )
        .unwrap();
        let config = SiteConfig::default();
        let page = render_tag_page(&context(&store, &config), "Web Audio");
        assert_eq!(page.page.path, "projects/tags/web-audio/index.html");
        let html = page.html.into_string();
        assert!(html.contains(r#"href="/projects/a/""#));
        assert!(!html.contains(r#"href="/projects/b/""#));
    }

    #[test]
    fn pinned_theme_sets_color_scheme_meta() {
        let store = fixture_store();
        let mut config = SiteConfig::default();
        config.theme.mode = ThemeMode::Dark;
        let html = render_not_found(&context(&store, &config))
            .html
            .into_string();
        assert!(html.contains(r#"<meta name="color-scheme" content="dark">"#));
    }

    #[test]
    fn canonical_link_uses_base_url() {
        let store = fixture_store();
        let mut config = SiteConfig::default();
        let project = store.project_by_slug("atlas").unwrap();
        let html = render_project_page(&context(&store, &config), project)
            .html
            .into_string();
        assert!(!html.contains("rel=\"canonical\""));

        config.site.base_url = "https://jane.example.com/".to_string();
        let html = render_project_page(&context(&store, &config), project)
            .html
            .into_string();
        assert!(html.contains(r#"<link rel="canonical" href="https://jane.example.com/projects/atlas/">"#));
    }

    #[test]
    fn content_is_escaped() {
        let mut p = profile();
        p.name = "<script>alert('x')</script>".to_string();
        let store = ContentStore::from_parts(p, vec![], vec![]).unwrap();
        let config = SiteConfig::default();
        let html = render_not_found(&context(&store, &config))
            .html
            .into_string();
        assert!(!html.contains("<script>alert"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn content_hash_is_stable_and_short() {
        assert_eq!(content_hash("body {}"), content_hash("body {}"));
        assert_ne!(content_hash("body {}"), content_hash("body { }"));
        assert_eq!(content_hash("x").len(), 10);
    }

    #[test]
    fn copy_assets_skips_dotfiles_and_nests() {
        let src = TempDir::new().unwrap();
        let dst = TempDir::new().unwrap();
        fs::create_dir_all(src.path().join("images")).unwrap();
        fs::write(src.path().join("resume.pdf"), b"%PDF").unwrap();
        fs::write(src.path().join("images/cover.jpg"), b"jpg").unwrap();
        fs::write(src.path().join(".DS_Store"), b"junk").unwrap();

        let copied = copy_assets(src.path(), dst.path()).unwrap();
        assert_eq!(copied, 2);
        assert!(dst.path().join("resume.pdf").exists());
        assert!(dst.path().join("images/cover.jpg").exists());
        assert!(!dst.path().join(".DS_Store").exists());
    }

    #[test]
    fn copy_assets_missing_dir_is_noop() {
        let dst = TempDir::new().unwrap();
        assert_eq!(
            copy_assets(&dst.path().join("nope"), dst.path()).unwrap(),
            0
        );
    }

    #[test]
    fn generate_writes_every_page() {
        let tmp = setup_fixtures();
        let out = TempDir::new().unwrap();
        let store = ContentStore::load(tmp.path()).unwrap();
        let config = config::load_config(tmp.path()).unwrap();

        let report = generate(&store, &config, tmp.path(), out.path()).unwrap();

        assert_eq!(report.count(PageKind::Home), 1);
        assert_eq!(report.count(PageKind::Project), store.all_projects().len());
        assert_eq!(report.count(PageKind::Post), store.posts_by_date_desc().len());
        assert_eq!(report.count(PageKind::Tag), store.all_tags().len());
        for page in &report.pages {
            assert!(out.path().join(&page.path).exists(), "{}", page.path);
        }
        assert!(out.path().join(&report.stylesheet).exists());
        assert!(out.path().join("resume.pdf").exists());
        assert!(out.path().join("404.html").exists());
    }

    #[test]
    fn generate_prunes_stale_pages_and_stylesheets() {
        let tmp = setup_fixtures();
        let out = TempDir::new().unwrap();
        let store = ContentStore::load(tmp.path()).unwrap();
        let config = config::load_config(tmp.path()).unwrap();

        let stale_project = out.path().join("projects/retired/index.html");
        let stale_post = out.path().join("blog/old-post/index.html");
        let stale_css = out.path().join("assets/site.0000000000.css");
        let keep = out.path().join("assets/notes.txt");
        for path in [&stale_project, &stale_post, &stale_css, &keep] {
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, "stale").unwrap();
        }

        let report = generate(&store, &config, tmp.path(), out.path()).unwrap();

        assert!(!stale_project.exists());
        assert!(!stale_post.exists());
        assert!(!stale_css.exists());
        assert!(keep.exists());
        assert!(out.path().join(&report.stylesheet).exists());
        assert!(out.path().join("projects/atlas/index.html").exists());
        assert!(out.path().join("resume.pdf").exists());
    }
}
