//! Atom feed decoding for arXiv API responses.
//!
//! The export API answers with an Atom document that mixes three namespaces:
//! plain Atom for the entry fields, the arXiv extension (`arxiv:comment`,
//! `arxiv:affiliation`, ...) and OpenSearch for the total hit count. Elements
//! are matched on their local name, which is unambiguous for the fields read
//! here.
//!
//! Missing elements never fail decoding; they produce empty strings. Anything
//! that is not well-formed XML, or whose root is not `<feed>`, is fatal.

use crate::classify::detect_industry;
use crate::error::Error;
use crate::models::Paper;
use crate::utils::normalize_whitespace;
use quick_xml::Reader;
use quick_xml::escape::unescape;
use quick_xml::events::{BytesStart, Event};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// How much of each entry is decoded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DecodeMode {
    /// Decode author affiliations and the arXiv comment for industry detection.
    #[default]
    Full,
    /// Skip affiliations and comments; detection sees the abstract only.
    Lite,
}

/// One decoded page of search results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedPage {
    /// `opensearch:totalResults`, or 0 when absent.
    pub total_results: u64,
    /// Entries in feed order, already classified.
    pub papers: Vec<Paper>,
}

#[derive(Debug, Default)]
struct EntryBuilder {
    id: String,
    title: String,
    summary: String,
    published: String,
    updated: String,
    comment: String,
    pdf_url: String,
    abs_url: String,
    first_href: Option<String>,
    categories: Vec<String>,
    authors: Vec<String>,
    affiliations: Vec<String>,
}

impl EntryBuilder {
    /// Handle an opening (or empty) element. `depth` counts elements below `<entry>`.
    fn open(&mut self, depth: usize, name: &str, e: &BytesStart<'_>) {
        if depth != 0 {
            return;
        }
        match name {
            "link" => {
                let href = attr(e, b"href").unwrap_or_default();
                if self.first_href.is_none() {
                    self.first_href = Some(href.clone());
                }
                if attr(e, b"title").as_deref() == Some("pdf") {
                    self.pdf_url = href.clone();
                }
                if attr(e, b"type").as_deref() == Some("text/html") {
                    self.abs_url = href;
                }
            }
            "category" => {
                if let Some(term) = attr(e, b"term").filter(|t| !t.is_empty()) {
                    self.categories.push(term);
                }
            }
            _ => {}
        }
    }

    /// Handle a closing element; `parents` are the open elements below `<entry>`.
    fn close(&mut self, parents: &[String], name: &str, text: String, mode: DecodeMode) {
        match parents {
            [] => match name {
                "id" => self.id = text.trim().to_string(),
                "title" => self.title = text,
                "summary" => self.summary = text,
                "published" => self.published = text.trim().to_string(),
                "updated" => self.updated = text.trim().to_string(),
                "comment" if mode == DecodeMode::Full => self.comment = text.trim().to_string(),
                _ => {}
            },
            [author] if author == "author" => {
                let value = text.trim();
                if value.is_empty() {
                    return;
                }
                match name {
                    "name" => self.authors.push(value.to_string()),
                    "affiliation" if mode == DecodeMode::Full => {
                        self.affiliations.push(value.to_string())
                    }
                    _ => {}
                }
            }
            _ => {}
        }
    }

    fn finish(self) -> Paper {
        let title = normalize_whitespace(&self.title);
        let abstract_text = normalize_whitespace(&self.summary);
        let industry_source = detect_industry(&self.affiliations, &abstract_text, &self.comment);
        let abs_url = if self.abs_url.is_empty() {
            self.first_href.unwrap_or_default()
        } else {
            self.abs_url
        };

        Paper {
            id: self.id,
            title,
            authors: self.authors,
            affiliations: self.affiliations,
            abstract_text,
            published: self.published,
            updated: self.updated,
            categories: self.categories,
            pdf_url: self.pdf_url,
            abs_url,
            industry_source,
        }
    }
}

fn local_name(e: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(e.local_name().as_ref()).into_owned()
}

fn attr(e: &BytesStart<'_>, key: &[u8]) -> Option<String> {
    let a = e
        .attributes()
        .flatten()
        .find(|a| a.key.local_name().as_ref() == key)?;
    let raw = String::from_utf8_lossy(&a.value).into_owned();
    let value = match unescape(&raw) {
        Ok(v) => v.into_owned(),
        Err(_) => raw,
    };
    Some(value)
}

/// Append a resolved `&name;` reference, keeping unknown entities literally.
fn push_reference(text: &mut String, name: &str) {
    let literal = format!("&{name};");
    match unescape(&literal) {
        Ok(resolved) => text.push_str(&resolved),
        Err(_) => text.push_str(&literal),
    }
}

fn check_root(name: &str) -> Result<(), Error> {
    if name == "feed" {
        Ok(())
    } else {
        Err(Error::malformed(format!("expected <feed> root element, found <{name}>")))
    }
}

/// Decode an arXiv Atom response into classified papers.
#[instrument(level = "info", skip_all, fields(bytes = xml.len(), mode = ?mode))]
pub fn parse_feed(xml: &str, mode: DecodeMode) -> Result<FeedPage, Error> {
    let mut reader = Reader::from_str(xml);
    let mut path: Vec<String> = Vec::new();
    let mut text = String::new();
    let mut entry: Option<EntryBuilder> = None;
    let mut papers = Vec::new();
    let mut total_results = 0u64;
    let mut saw_root = false;

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                let name = local_name(&e);
                if path.is_empty() {
                    check_root(&name)?;
                    saw_root = true;
                } else if path.len() == 1 && name == "entry" {
                    entry = Some(EntryBuilder::default());
                } else if let Some(builder) = entry.as_mut() {
                    builder.open(path.len() - 2, &name, &e);
                }
                path.push(name);
                text.clear();
            }
            Event::Empty(e) => {
                let name = local_name(&e);
                if path.is_empty() {
                    check_root(&name)?;
                    saw_root = true;
                } else if path.len() == 1 && name == "entry" {
                    papers.push(EntryBuilder::default().finish());
                } else if let Some(builder) = entry.as_mut() {
                    builder.open(path.len() - 2, &name, &e);
                }
            }
            Event::Text(t) => text.push_str(&String::from_utf8_lossy(&t)),
            Event::CData(t) => text.push_str(&String::from_utf8_lossy(&t)),
            Event::GeneralRef(r) => push_reference(&mut text, &String::from_utf8_lossy(&r)),
            Event::End(_) => {
                let name = path
                    .pop()
                    .ok_or_else(|| Error::malformed("closing tag without an open element"))?;
                let value = std::mem::take(&mut text);
                match path.len() {
                    1 if name == "entry" => {
                        if let Some(builder) = entry.take() {
                            papers.push(builder.finish());
                        }
                    }
                    1 if name == "totalResults" => {
                        let trimmed = value.trim();
                        if !trimmed.is_empty() {
                            total_results = trimmed.parse().map_err(|_| {
                                Error::malformed(format!("totalResults is not a number: {trimmed:?}"))
                            })?;
                        }
                    }
                    n if n >= 2 => {
                        if let Some(builder) = entry.as_mut() {
                            builder.close(&path[2..], &name, value, mode);
                        }
                    }
                    _ => {}
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !saw_root {
        return Err(Error::malformed("document has no root element"));
    }
    if let Some(open) = path.last() {
        return Err(Error::malformed(format!("document ends inside <{open}>")));
    }

    debug!(entries = papers.len(), total_results, "Decoded feed");
    Ok(FeedPage {
        total_results,
        papers,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <link href="http://arxiv.org/api/query?search_query=x" rel="self" type="application/atom+xml"/>
  <title type="html">ArXiv Query: search_query=x</title>
  <id>http://arxiv.org/api/feedid</id>
  <updated>2025-06-01T00:00:00-04:00</updated>
  <opensearch:totalResults xmlns:opensearch="http://a9.com/-/spec/opensearch/1.1/">1287</opensearch:totalResults>
  <opensearch:startIndex xmlns:opensearch="http://a9.com/-/spec/opensearch/1.1/">0</opensearch:startIndex>
  <opensearch:itemsPerPage xmlns:opensearch="http://a9.com/-/spec/opensearch/1.1/">50</opensearch:itemsPerPage>
  <entry>
    <id>http://arxiv.org/abs/2506.00001v1</id>
    <updated>2025-06-01T17:59:59Z</updated>
    <published>2025-05-30T17:59:59Z</published>
    <title>OneRec: Unifying Retrieve and Rank
      with   Generative Recommender</title>
    <summary>  We present a generative
  recommender deployed at scale.
</summary>
    <author>
      <name>Alice Zhang</name>
      <arxiv:affiliation xmlns:arxiv="http://arxiv.org/schemas/atom">Tencent Inc.</arxiv:affiliation>
    </author>
    <author>
      <name>Bob Li</name>
    </author>
    <arxiv:comment xmlns:arxiv="http://arxiv.org/schemas/atom">12 pages</arxiv:comment>
    <link href="http://arxiv.org/abs/2506.00001v1" rel="alternate" type="text/html"/>
    <link title="pdf" href="http://arxiv.org/pdf/2506.00001v1" rel="related" type="application/pdf"/>
    <arxiv:primary_category xmlns:arxiv="http://arxiv.org/schemas/atom" term="cs.IR" scheme="http://arxiv.org/schemas/atom"/>
    <category term="cs.IR" scheme="http://arxiv.org/schemas/atom"/>
    <category term="cs.LG" scheme="http://arxiv.org/schemas/atom"/>
  </entry>
  <entry>
    <id>http://arxiv.org/abs/2506.00002v2</id>
    <updated>2025-06-02T00:00:00Z</updated>
    <published>2025-05-29T00:00:00Z</published>
    <title>Diffusion &amp; Retrieval for Recommendation</title>
    <summary>An academic study of diffusion models.</summary>
    <author><name>Carol Wang</name></author>
    <arxiv:comment xmlns:arxiv="http://arxiv.org/schemas/atom">Work done during an internship at Kuaishou</arxiv:comment>
    <link href="http://arxiv.org/abs/2506.00002v2" rel="alternate"/>
    <category term="cs.IR" scheme="http://arxiv.org/schemas/atom"/>
  </entry>
  <entry>
    <id>http://arxiv.org/abs/2506.00003v1</id>
    <title>Semantic IDs</title>
    <summary>We study tokenization of items.</summary>
    <author><name>Dan Brown</name></author>
  </entry>
</feed>
"#;

    #[test]
    fn test_parses_every_entry_with_id() {
        let page = parse_feed(FIXTURE, DecodeMode::Full).unwrap();
        assert_eq!(page.papers.len(), 3);
        assert!(page.papers.iter().all(|p| !p.id.is_empty()));
        assert_eq!(page.total_results, 1287);
    }

    #[test]
    fn test_feed_level_elements_do_not_leak_into_entries() {
        let page = parse_feed(FIXTURE, DecodeMode::Full).unwrap();
        assert_eq!(page.papers[0].id, "http://arxiv.org/abs/2506.00001v1");
        assert!(page.papers.iter().all(|p| p.title != "ArXiv Query: search_query=x"));
    }

    #[test]
    fn test_scalar_fields_and_whitespace_normalization() {
        let page = parse_feed(FIXTURE, DecodeMode::Full).unwrap();
        let p = &page.papers[0];
        assert_eq!(p.title, "OneRec: Unifying Retrieve and Rank with Generative Recommender");
        assert_eq!(p.abstract_text, "We present a generative recommender deployed at scale.");
        assert_eq!(p.published, "2025-05-30T17:59:59Z");
        assert_eq!(p.updated, "2025-06-01T17:59:59Z");
        assert_eq!(p.authors, vec!["Alice Zhang", "Bob Li"]);
    }

    #[test]
    fn test_links_pdf_and_html() {
        let page = parse_feed(FIXTURE, DecodeMode::Full).unwrap();
        let p = &page.papers[0];
        assert_eq!(p.pdf_url, "http://arxiv.org/pdf/2506.00001v1");
        assert_eq!(p.abs_url, "http://arxiv.org/abs/2506.00001v1");
    }

    #[test]
    fn test_untyped_link_falls_back_to_first_href() {
        let page = parse_feed(FIXTURE, DecodeMode::Full).unwrap();
        let p = &page.papers[1];
        assert_eq!(p.abs_url, "http://arxiv.org/abs/2506.00002v2");
        assert_eq!(p.pdf_url, "");
    }

    #[test]
    fn test_missing_fields_default_to_empty() {
        let page = parse_feed(FIXTURE, DecodeMode::Full).unwrap();
        let p = &page.papers[2];
        assert_eq!(p.published, "");
        assert_eq!(p.updated, "");
        assert_eq!(p.pdf_url, "");
        assert_eq!(p.abs_url, "");
        assert!(p.categories.is_empty());
        assert!(p.affiliations.is_empty());
        assert_eq!(p.industry_source, "");
    }

    #[test]
    fn test_categories_keep_order_and_skip_primary_category() {
        let page = parse_feed(FIXTURE, DecodeMode::Full).unwrap();
        assert_eq!(page.papers[0].categories, vec!["cs.IR", "cs.LG"]);
    }

    #[test]
    fn test_entities_are_resolved() {
        let page = parse_feed(FIXTURE, DecodeMode::Full).unwrap();
        assert_eq!(page.papers[1].title, "Diffusion & Retrieval for Recommendation");
    }

    #[test]
    fn test_full_mode_detects_from_affiliation_and_comment() {
        let page = parse_feed(FIXTURE, DecodeMode::Full).unwrap();
        assert_eq!(page.papers[0].affiliations, vec!["Tencent Inc."]);
        assert_eq!(page.papers[0].industry_source, "Tencent");
        assert_eq!(page.papers[1].industry_source, "Kuaishou");
    }

    #[test]
    fn test_lite_mode_skips_affiliations_and_comment() {
        let page = parse_feed(FIXTURE, DecodeMode::Lite).unwrap();
        assert_eq!(page.papers.len(), 3);
        assert!(page.papers[0].affiliations.is_empty());
        assert_eq!(page.papers[0].industry_source, "");
        assert_eq!(page.papers[1].industry_source, "");
    }

    #[test]
    fn test_pdf_link_without_html_link() {
        let xml = r#"<feed><entry>
            <id>x</id>
            <link href="http://arxiv.org/abs/x" rel="alternate"/>
            <link title="pdf" href="http://arxiv.org/pdf/x"/>
        </entry></feed>"#;
        let page = parse_feed(xml, DecodeMode::Full).unwrap();
        assert_eq!(page.papers[0].pdf_url, "http://arxiv.org/pdf/x");
        assert_eq!(page.papers[0].abs_url, "http://arxiv.org/abs/x");
    }

    #[test]
    fn test_empty_feed() {
        let page = parse_feed(r#"<feed xmlns="http://www.w3.org/2005/Atom"/>"#, DecodeMode::Full).unwrap();
        assert!(page.papers.is_empty());
        assert_eq!(page.total_results, 0);
    }

    #[test]
    fn test_mismatched_tags_are_fatal() {
        let err = parse_feed("<feed><entry><id>x</title></entry></feed>", DecodeMode::Full).unwrap_err();
        assert!(matches!(err, Error::Xml(_)));
    }

    #[test]
    fn test_truncated_document_is_fatal() {
        assert!(parse_feed("<feed><entry><id>x</id>", DecodeMode::Full).is_err());
    }

    #[test]
    fn test_non_feed_root_is_fatal() {
        let err = parse_feed("<html><body>Rate limited</body></html>", DecodeMode::Full).unwrap_err();
        assert!(matches!(err, Error::Malformed(_)));
    }

    #[test]
    fn test_empty_body_is_fatal() {
        let err = parse_feed("", DecodeMode::Full).unwrap_err();
        assert!(matches!(err, Error::Malformed(_)));
    }

    #[test]
    fn test_non_numeric_total_is_fatal() {
        let xml = "<feed><opensearch:totalResults>many</opensearch:totalResults></feed>";
        let err = parse_feed(xml, DecodeMode::Full).unwrap_err();
        assert!(matches!(err, Error::Malformed(_)));
    }

    #[test]
    fn test_decode_mode_serde() {
        let mode: DecodeMode = serde_yaml::from_str("lite").unwrap();
        assert_eq!(mode, DecodeMode::Lite);
        assert_eq!(DecodeMode::default(), DecodeMode::Full);
    }
}
