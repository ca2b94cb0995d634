use crate::error::DumpError;
use crate::models::{Page, Revision, SiteInfo};
use crate::source::{self, DumpStream};
use quick_xml::events::Event;
use quick_xml::reader::Reader;
use std::io::BufRead;
use std::path::Path;
use std::str::FromStr;
use tracing::debug;

/// Pull interface over a dump: site metadata plus one page at a time.
pub trait DumpParser {
    fn site_info(&self) -> &SiteInfo;

    /// `Ok(None)` signals a clean end of the dump.
    fn next_page(&mut self) -> Result<Option<Page>, DumpError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tag {
    SiteInfo,
    SiteName,
    Base,
    Page,
    Title,
    Ns,
    Id,
    Redirect,
    Revision,
    Text,
    Other,
}

impl Tag {
    fn of(name: &[u8]) -> Self {
        match name {
            b"siteinfo" => Tag::SiteInfo,
            b"sitename" => Tag::SiteName,
            b"base" => Tag::Base,
            b"page" => Tag::Page,
            b"title" => Tag::Title,
            b"ns" => Tag::Ns,
            b"id" => Tag::Id,
            b"redirect" => Tag::Redirect,
            b"revision" => Tag::Revision,
            b"text" => Tag::Text,
            _ => Tag::Other,
        }
    }

    fn label(self) -> &'static str {
        match self {
            Tag::SiteInfo => "siteinfo",
            Tag::SiteName => "sitename",
            Tag::Base => "base",
            Tag::Page => "page",
            Tag::Title => "title",
            Tag::Ns => "ns",
            Tag::Id => "id",
            Tag::Redirect => "redirect",
            Tag::Revision => "revision",
            Tag::Text => "text",
            Tag::Other => "element",
        }
    }
}

/// Owned summary of one XML event, so the read buffer can be reused right away.
enum Step {
    Open(Tag),
    Empty,
    Close(Tag),
    Redirect(String),
    Eof,
    Other,
}

/// Streaming MediaWiki export reader. Holds at most one page in memory.
pub struct WikiReader<R: BufRead> {
    reader: Reader<R>,
    buf: Vec<u8>,
    site: SiteInfo,
    // `<page>` start already consumed while looking for `<siteinfo>`
    page_open: bool,
    done: bool,
}

impl WikiReader<DumpStream> {
    /// Opens a dump file (bzip2 when the name ends in `.bz2`) and reads its header.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, DumpError> {
        Self::new(source::open(path)?)
    }
}

impl<R: BufRead> WikiReader<R> {
    pub fn new(input: R) -> Result<Self, DumpError> {
        let mut wiki = Self {
            reader: Reader::from_reader(input),
            buf: Vec::with_capacity(8192),
            site: SiteInfo::default(),
            page_open: false,
            done: false,
        };
        wiki.read_site_info()?;
        Ok(wiki)
    }

    fn step(&mut self) -> Result<Step, DumpError> {
        self.buf.clear();
        let step = match self.reader.read_event_into(&mut self.buf)? {
            Event::Start(e) | Event::Empty(e) if Tag::of(e.local_name().as_ref()) == Tag::Redirect => {
                let target = match e.try_get_attribute("title")? {
                    Some(attr) => attr.unescape_value()?.into_owned(),
                    None => String::new(),
                };
                Step::Redirect(target)
            }
            Event::Start(e) => Step::Open(Tag::of(e.local_name().as_ref())),
            Event::Empty(_) => Step::Empty,
            Event::End(e) => Step::Close(Tag::of(e.local_name().as_ref())),
            Event::Eof => Step::Eof,
            _ => Step::Other,
        };
        Ok(step)
    }

    /// Collects character data up to the closing `end` tag.
    fn read_text(&mut self, end: Tag) -> Result<String, DumpError> {
        let mut out = String::new();
        loop {
            self.buf.clear();
            match self.reader.read_event_into(&mut self.buf)? {
                Event::Text(t) => out.push_str(&t.unescape()?),
                Event::CData(c) => {
                    let raw = std::str::from_utf8(&c).map_err(|e| DumpError::Parse(e.to_string()))?;
                    out.push_str(raw);
                }
                Event::End(e) if Tag::of(e.local_name().as_ref()) == end => return Ok(out),
                Event::Eof => return Err(unexpected_eof(end)),
                _ => {}
            }
        }
    }

    fn read_site_info(&mut self) -> Result<(), DumpError> {
        loop {
            match self.step()? {
                Step::Open(Tag::SiteName) => {
                    self.site.name = self.read_text(Tag::SiteName)?.trim().to_string();
                }
                Step::Open(Tag::Base) => {
                    self.site.base_url = self.read_text(Tag::Base)?.trim().to_string();
                }
                Step::Close(Tag::SiteInfo) => return Ok(()),
                Step::Open(Tag::Page) => {
                    debug!("Dump has no <siteinfo> header");
                    self.page_open = true;
                    return Ok(());
                }
                Step::Eof => {
                    self.done = true;
                    return Ok(());
                }
                _ => {}
            }
        }
    }

    fn read_page(&mut self) -> Result<Page, DumpError> {
        let mut page = Page::default();
        let mut seen_id = false;
        let mut in_revision = false;

        loop {
            match self.step()? {
                Step::Open(Tag::Title) if !in_revision => {
                    page.title = self.read_text(Tag::Title)?;
                }
                Step::Open(Tag::Ns) if !in_revision => {
                    page.namespace = parse_number(&self.read_text(Tag::Ns)?, Tag::Ns)?;
                }
                Step::Open(Tag::Id) => {
                    let raw = self.read_text(Tag::Id)?;
                    // revision and contributor ids come later and are not the page id
                    if !in_revision && !seen_id {
                        page.id = parse_number(&raw, Tag::Id)?;
                        seen_id = true;
                    }
                }
                Step::Redirect(target) => page.redirect_target = Some(target),
                Step::Open(Tag::Revision) => {
                    in_revision = true;
                    page.revisions.push(Revision::default());
                }
                Step::Close(Tag::Revision) => in_revision = false,
                Step::Open(Tag::Text) if in_revision => {
                    let text = self.read_text(Tag::Text)?;
                    if let Some(rev) = page.revisions.last_mut() {
                        rev.text = text;
                    }
                }
                Step::Close(Tag::Page) => return Ok(page),
                Step::Eof => return Err(unexpected_eof(Tag::Page)),
                Step::Open(_) | Step::Empty | Step::Close(_) | Step::Other => {}
            }
        }
    }
}

impl<R: BufRead> DumpParser for WikiReader<R> {
    fn site_info(&self) -> &SiteInfo {
        &self.site
    }

    fn next_page(&mut self) -> Result<Option<Page>, DumpError> {
        if self.done {
            return Ok(None);
        }
        if !self.page_open {
            loop {
                match self.step() {
                    Ok(Step::Open(Tag::Page)) => break,
                    Ok(Step::Eof) => {
                        self.done = true;
                        return Ok(None);
                    }
                    Ok(_) => {}
                    Err(e) => {
                        self.done = true;
                        return Err(e);
                    }
                }
            }
        }
        self.page_open = false;

        match self.read_page() {
            Ok(page) => Ok(Some(page)),
            Err(e) => {
                self.done = true;
                Err(e)
            }
        }
    }
}

impl<R: BufRead> Iterator for WikiReader<R> {
    type Item = Result<Page, DumpError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_page().transpose()
    }
}

fn parse_number<T: FromStr>(raw: &str, tag: Tag) -> Result<T, DumpError> {
    raw.trim()
        .parse()
        .map_err(|_| DumpError::Parse(format!("invalid <{}> value: {:?}", tag.label(), raw)))
}

fn unexpected_eof(inside: Tag) -> DumpError {
    DumpError::Parse(format!("unexpected end of dump inside <{}>", inside.label()))
}
