//! Tantivy-based site search index.
//!
//! Indexes the static pages, services, projects and contact entries of the
//! current site content so visitors can jump to them from the search modal.

use std::path::Path;
use std::sync::Arc;
use tantivy::collector::{Count, TopDocs};
use tantivy::query::{BooleanQuery, BoostQuery, Occur, QueryParser};
use tantivy::schema::{Field, Schema, Value, STORED, STRING, TEXT};
use tantivy::{doc, Index, IndexReader, IndexWriter, ReloadPolicy, TantivyDocument};
use tokio::sync::RwLock;

use serde::Serialize;

use crate::errors::AppError;
use crate::models::SiteContent;

/// Field boost values.
const BOOST_TITLE: f32 = 10.0;
const BOOST_DESCRIPTION: f32 = 7.0;
const BOOST_BODY: f32 = 4.0;

/// Queries shorter than this return no results.
pub const MIN_QUERY_LEN: usize = 2;

/// Offsets past this return an empty page.
pub const MAX_SEARCH_OFFSET: usize = 10_000;

/// Static pages of the site, always searchable.
const PAGES: [(&str, &str, &str); 4] = [
    ("Home", "The main landing page for Kaste Brands & Designs.", "/"),
    ("About Us", "Learn more about our company, mission, and team.", "/about"),
    ("Services", "Explore all the digital solutions and services we offer.", "/services"),
    ("Contact Us", "Get in touch with us for a project or inquiry.", "/contact"),
];

/// What a search hit points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Page,
    Service,
    Project,
    Contact,
}

impl EntryKind {
    fn as_str(self) -> &'static str {
        match self {
            EntryKind::Page => "page",
            EntryKind::Service => "service",
            EntryKind::Project => "project",
            EntryKind::Contact => "contact",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s {
            "page" => Some(EntryKind::Page),
            "service" => Some(EntryKind::Service),
            "project" => Some(EntryKind::Project),
            "contact" => Some(EntryKind::Contact),
            _ => None,
        }
    }
}

/// A searchable entry derived from the site content.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchEntry {
    pub kind: EntryKind,
    pub title: String,
    pub description: String,
    /// In-site route, or an external/mailto/tel link for contact entries.
    pub link: String,
    /// Extra text matched but not displayed.
    pub body: String,
}

/// Search result with entry and relevance score.
#[derive(Debug, Clone, Serialize)]
pub struct SearchResult {
    pub kind: EntryKind,
    pub title: String,
    pub description: String,
    pub link: String,
    pub score: f32,
}

/// One page of hits plus the total number of matching entries.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SearchPage {
    pub results: Vec<SearchResult>,
    pub total: usize,
}

/// Search index schema fields.
struct SearchFields {
    kind: Field,
    title: Field,
    description: Field,
    body: Field,
    link: Field,
}

/// Tantivy search index for site entries.
pub struct SearchIndex {
    index: Index,
    reader: IndexReader,
    writer: Arc<RwLock<IndexWriter>>,
    fields: SearchFields,
}

impl SearchIndex {
    /// Create or open a search index at the specified path.
    pub fn open(index_path: &Path) -> Result<Self, AppError> {
        std::fs::create_dir_all(index_path)
            .map_err(|e| AppError::Search(format!("Failed to create index directory: {}", e)))?;

        let mut schema_builder = Schema::builder();
        let kind = schema_builder.add_text_field("kind", STRING | STORED);
        let title = schema_builder.add_text_field("title", TEXT | STORED);
        let description = schema_builder.add_text_field("description", TEXT | STORED);
        let body = schema_builder.add_text_field("body", TEXT);
        let link = schema_builder.add_text_field("link", STORED);
        let schema = schema_builder.build();

        let fields = SearchFields {
            kind,
            title,
            description,
            body,
            link,
        };

        // Try to open existing index or create new one
        let index = Index::open_in_dir(index_path)
            .or_else(|_| Index::create_in_dir(index_path, schema.clone()))
            .map_err(|e| AppError::Search(format!("Failed to open/create index: {}", e)))?;

        let reader = index
            .reader_builder()
            .reload_policy(ReloadPolicy::OnCommitWithDelay)
            .try_into()
            .map_err(|e| AppError::Search(format!("Failed to create reader: {}", e)))?;

        let writer = index
            .writer(50_000_000) // 50MB buffer
            .map_err(|e| AppError::Search(format!("Failed to create writer: {}", e)))?;

        Ok(Self {
            index,
            reader,
            writer: Arc::new(RwLock::new(writer)),
            fields,
        })
    }

    /// Rebuild the entire index from the site content.
    pub async fn rebuild(&self, content: &SiteContent) -> Result<(), AppError> {
        let entries = entries_for(content);
        let mut writer = self.writer.write().await;

        writer.delete_all_documents()?;
        for entry in &entries {
            writer.add_document(doc!(
                self.fields.kind => entry.kind.as_str().to_string(),
                self.fields.title => entry.title.clone(),
                self.fields.description => entry.description.clone(),
                self.fields.body => entry.body.clone(),
                self.fields.link => entry.link.clone()
            ))?;
        }
        writer.commit()?;

        self.reader.reload()?;

        tracing::info!("Search index rebuilt with {} entries", entries.len());
        Ok(())
    }

    /// Search for entries matching the query.
    pub fn search(
        &self,
        query_str: &str,
        limit: usize,
        offset: usize,
    ) -> Result<SearchPage, AppError> {
        let query_str = query_str.trim();
        if query_str.chars().count() < MIN_QUERY_LEN {
            return Ok(SearchPage::default());
        }

        let searcher = self.reader.searcher();

        // Lenient parsing: visitors type free text, not query syntax.
        let mut subqueries: Vec<(Occur, Box<dyn tantivy::query::Query>)> = Vec::new();
        let field_queries = [
            (self.fields.title, BOOST_TITLE),
            (self.fields.description, BOOST_DESCRIPTION),
            (self.fields.body, BOOST_BODY),
        ];
        for (field, boost) in field_queries {
            let parser = QueryParser::for_index(&self.index, vec![field]);
            let (field_query, _errors) = parser.parse_query_lenient(query_str);
            subqueries.push((Occur::Should, Box::new(BoostQuery::new(field_query, boost))));
        }
        let combined_query = BooleanQuery::new(subqueries);

        // TopDocs rejects a zero limit.
        if limit == 0 || offset > MAX_SEARCH_OFFSET {
            let total = searcher
                .search(&combined_query, &Count)
                .map_err(|e| AppError::Search(format!("Search failed: {}", e)))?;
            return Ok(SearchPage {
                results: Vec::new(),
                total,
            });
        }

        let (top_docs, total) = searcher
            .search(
                &combined_query,
                &(TopDocs::with_limit(offset.saturating_add(limit)), Count),
            )
            .map_err(|e| AppError::Search(format!("Search failed: {}", e)))?;

        let results = top_docs
            .into_iter()
            .skip(offset)
            .take(limit)
            .filter_map(|(score, doc_address)| {
                let doc: TantivyDocument = searcher.doc(doc_address).ok()?;
                let text = |field: Field| -> Option<String> {
                    Some(doc.get_first(field)?.as_str()?.to_string())
                };
                Some(SearchResult {
                    kind: EntryKind::parse(&text(self.fields.kind)?)?,
                    title: text(self.fields.title)?,
                    description: text(self.fields.description).unwrap_or_default(),
                    link: text(self.fields.link).unwrap_or_default(),
                    score,
                })
            })
            .collect();

        Ok(SearchPage { results, total })
    }
}

/// Derive the searchable entries for a document.
pub fn entries_for(content: &SiteContent) -> Vec<SearchEntry> {
    let mut entries = Vec::new();

    for (title, description, url) in PAGES {
        entries.push(SearchEntry {
            kind: EntryKind::Page,
            title: title.to_string(),
            description: description.to_string(),
            link: url.to_string(),
            body: String::new(),
        });
    }

    for service in &content.services {
        entries.push(SearchEntry {
            kind: EntryKind::Service,
            title: service.title.clone(),
            description: service.description.clone(),
            link: format!("/service/{}", service.id),
            body: service.long_description.clone(),
        });
    }

    for project in &content.projects {
        let service_title = content
            .service_by_id(&project.service_id)
            .map(|s| s.title.as_str());
        entries.push(SearchEntry {
            kind: EntryKind::Project,
            title: project.title.clone(),
            description: format!("Project in {}", service_title.unwrap_or("Uncategorized")),
            link: format!("/service/{}", project.service_id),
            body: format!("{} {}", project.description, service_title.unwrap_or_default()),
        });
    }

    let details = &content.contact.details;
    entries.push(SearchEntry {
        kind: EntryKind::Contact,
        title: "Email Us".to_string(),
        description: details.email.clone(),
        link: format!("mailto:{}", details.email),
        body: String::new(),
    });
    entries.push(SearchEntry {
        kind: EntryKind::Contact,
        title: "Call Us".to_string(),
        description: details.phone.clone(),
        link: format!("tel:{}", details.phone),
        body: String::new(),
    });
    for link in &content.footer.social_links {
        let display = link
            .url
            .strip_prefix("https://")
            .or_else(|| link.url.strip_prefix("http://"))
            .unwrap_or(&link.url);
        entries.push(SearchEntry {
            kind: EntryKind::Contact,
            title: link.label.clone(),
            description: display.to_string(),
            link: link.url.clone(),
            body: String::new(),
        });
    }

    entries
}
