use indoc::indoc;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use thiserror::Error;

use crate::backend::{Filter, Record, RecordStore, StoreError, Table};
use crate::theme;

const ABOUT: &str = indoc! {"
    A content site presented as a desktop.

    Every page opens in its own window. Drag a header to move it,
    drag a border to resize, and drag past the screen edge to snap
    it to one half of the screen.
"};

const CONTACT: &str = indoc! {"
    Questions, corrections or ideas?

    Post them in the community board under /questions.
"};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    #[error("no page at {route}")]
    NotFound { route: String },
    #[error("invalid {name} `{value}`")]
    InvalidParam { name: &'static str, value: String },
    #[error("{what} not found")]
    MissingResource { what: String },
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// View a route resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content {
    Posts,
    Post { slug: String },
    Questions,
    QuestionsTopic { slug: String },
    Question { permalink: String },
    Search { query: Option<String> },
    Admin,
    Profile { username: String },
    About,
    Contact,
}

impl Content {
    pub fn default_title(&self) -> String {
        match self {
            Content::Posts => "Posts".into(),
            Content::Post { slug } => slug.clone(),
            Content::Questions => "Questions".into(),
            Content::QuestionsTopic { slug } => format!("Questions: {slug}"),
            Content::Question { permalink } => format!("Question {permalink}"),
            Content::Search { .. } => "Search".into(),
            Content::Admin => "Admin".into(),
            Content::Profile { username } => format!("@{username}"),
            Content::About => "About".into(),
            Content::Contact => "Contact".into(),
        }
    }
}

/// Maps a window route to what the window shows.
pub trait ContentRouter: std::fmt::Debug {
    fn resolve(&self, route: &str) -> Result<Content, RouteError>;

    fn render(&self, content: &Content, store: &dyn RecordStore)
        -> Result<Vec<Line<'static>>, RouteError>;

    /// Lines shown in place of content that failed to resolve.
    fn placeholder(&self, route: &str, error: &RouteError) -> Vec<Line<'static>> {
        vec![
            Line::styled(
                "not found",
                Style::default()
                    .fg(theme::not_found_fg())
                    .add_modifier(Modifier::BOLD),
            ),
            Line::raw(""),
            Line::raw(format!("{route}: {error}")),
        ]
    }

    /// Resolve and render in one step, falling back to the placeholder.
    fn view(&self, route: &str, store: &dyn RecordStore) -> Vec<Line<'static>> {
        match self
            .resolve(route)
            .and_then(|content| self.render(&content, store))
        {
            Ok(lines) => lines,
            Err(err) => {
                tracing::debug!(route, %err, "content unavailable");
                self.placeholder(route, &err)
            }
        }
    }
}

#[derive(Debug, Default)]
pub struct SiteRouter;

fn segment(name: &'static str, value: &str) -> Result<String, RouteError> {
    let valid = !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
    if valid {
        Ok(value.to_string())
    } else {
        Err(RouteError::InvalidParam {
            name,
            value: value.to_string(),
        })
    }
}

fn query_param(query: &str, key: &str) -> Option<String> {
    query.split('&').find_map(|pair| {
        let (k, v) = pair.split_once('=').unwrap_or((pair, ""));
        (k == key && !v.is_empty()).then(|| v.replace('+', " "))
    })
}

fn heading(text: impl Into<String>) -> Line<'static> {
    Line::styled(text.into(), Style::default().add_modifier(Modifier::BOLD))
}

fn bullet(record: &Record, field: &str) -> Line<'static> {
    let label = record.text(field).unwrap_or("untitled").to_string();
    Line::from(vec![Span::raw(" - "), Span::raw(label)])
}

impl ContentRouter for SiteRouter {
    fn resolve(&self, route: &str) -> Result<Content, RouteError> {
        let (path, query) = route.split_once('?').unwrap_or((route, ""));
        let path = if path.len() > 1 {
            path.trim_end_matches('/')
        } else {
            path
        };
        let parts: Vec<&str> = path.split('/').skip(1).collect();
        let content = match parts.as_slice() {
            ["questions", "topic", slug, ..] => Content::QuestionsTopic {
                slug: segment("topic", slug)?,
            },
            ["questions"] => Content::Questions,
            ["questions", permalink, ..] => Content::Question {
                permalink: segment("permalink", permalink)?,
            },
            ["posts" | "blog"] => Content::Posts,
            ["posts" | "blog", slug, ..] => Content::Post {
                slug: segment("slug", slug)?,
            },
            ["search"] => Content::Search {
                query: query_param(query, "q"),
            },
            ["admin"] => Content::Admin,
            ["profile", username] => Content::Profile {
                username: segment("username", username)?,
            },
            ["about"] => Content::About,
            ["contact"] => Content::Contact,
            _ => {
                return Err(RouteError::NotFound {
                    route: route.to_string(),
                });
            }
        };
        Ok(content)
    }

    fn render(
        &self,
        content: &Content,
        store: &dyn RecordStore,
    ) -> Result<Vec<Line<'static>>, RouteError> {
        let mut lines = Vec::new();
        match content {
            Content::Posts => {
                lines.push(heading("Posts"));
                let posts = store.select(Table::Posts, &Filter::all().order("id", false))?;
                lines.extend(posts.iter().map(|p| bullet(p, "title")));
            }
            Content::Post { slug } => {
                let post = store
                    .select(Table::Posts, &Filter::all().eq("slug", slug.as_str()))?
                    .into_iter()
                    .next()
                    .ok_or_else(|| RouteError::MissingResource {
                        what: format!("post {slug}"),
                    })?;
                lines.push(heading(post.text("title").unwrap_or(slug).to_string()));
                if let Some(author) = post.text("author") {
                    lines.push(Line::raw(format!("by {author}")));
                }
                lines.push(Line::raw(""));
                lines.push(Line::raw(post.text("content").unwrap_or("").to_string()));
            }
            Content::Questions => {
                lines.push(heading("Community"));
                let channels = store.select(Table::CommunityChannels, &Filter::all())?;
                for channel in &channels {
                    lines.push(Line::raw(format!(
                        "# {}",
                        channel.text("name").unwrap_or("channel")
                    )));
                    let posts = store.select(
                        Table::CommunityPosts,
                        &Filter::all().eq("channel_id", channel.id),
                    )?;
                    lines.extend(posts.iter().map(|p| bullet(p, "title")));
                }
            }
            Content::QuestionsTopic { slug } => {
                lines.push(heading(format!("Topic: {slug}")));
                let posts = store.select(
                    Table::CommunityPosts,
                    &Filter::all()
                        .eq("post_slug", slug.as_str())
                        .order("id", false),
                )?;
                if posts.is_empty() {
                    lines.push(Line::raw("no questions yet"));
                }
                lines.extend(posts.iter().map(|p| bullet(p, "title")));
            }
            Content::Question { permalink } => {
                let id: i64 = permalink.parse().map_err(|_| RouteError::InvalidParam {
                    name: "permalink",
                    value: permalink.clone(),
                })?;
                let post = store
                    .select(Table::CommunityPosts, &Filter::all().eq("id", id))?
                    .into_iter()
                    .next()
                    .ok_or_else(|| RouteError::MissingResource {
                        what: format!("question {permalink}"),
                    })?;
                lines.push(heading(post.text("title").unwrap_or("question").to_string()));
                lines.push(Line::raw(post.text("content").unwrap_or("").to_string()));
                let replies = store.select(
                    Table::CommunityReplies,
                    &Filter::all().eq("post_id", id).order("id", true),
                )?;
                let likes = store.select(Table::CommunityLikes, &Filter::all().eq("post_id", id))?;
                lines.push(Line::raw(""));
                lines.push(Line::raw(format!(
                    "{} replies, {} likes",
                    replies.len(),
                    likes.len()
                )));
                lines.extend(replies.iter().map(|r| bullet(r, "content")));
            }
            Content::Search { query } => {
                lines.push(heading("Search"));
                match query {
                    None => lines.push(Line::raw("type a query to search posts")),
                    Some(q) => {
                        let needle = q.to_lowercase();
                        let hits: Vec<Record> = store
                            .select(Table::Posts, &Filter::all())?
                            .into_iter()
                            .filter(|p| {
                                p.text("title")
                                    .is_some_and(|t| t.to_lowercase().contains(&needle))
                            })
                            .collect();
                        lines.push(Line::raw(format!("{} results for \"{q}\"", hits.len())));
                        lines.extend(hits.iter().map(|p| bullet(p, "title")));
                    }
                }
            }
            Content::Admin => {
                lines.push(heading("Admin"));
                for table in Table::ALL {
                    let count = store.select(table, &Filter::all())?.len();
                    lines.push(Line::raw(format!("{table}: {count}")));
                }
            }
            Content::Profile { username } => {
                let profile = store
                    .select(
                        Table::Profiles,
                        &Filter::all().eq("username", username.as_str()),
                    )?
                    .into_iter()
                    .next()
                    .ok_or_else(|| RouteError::MissingResource {
                        what: format!("profile {username}"),
                    })?;
                lines.push(heading(format!("@{username}")));
                let posts = store.select(
                    Table::Posts,
                    &Filter::all().eq("author", username.as_str()),
                )?;
                lines.push(Line::raw(format!("member #{}, {} posts", profile.id, posts.len())));
                lines.extend(posts.iter().map(|p| bullet(p, "title")));
            }
            Content::About => lines.extend(ABOUT.lines().map(|l| Line::raw(l.to_string()))),
            Content::Contact => lines.extend(CONTACT.lines().map(|l| Line::raw(l.to_string()))),
        }
        Ok(lines)
    }
}
