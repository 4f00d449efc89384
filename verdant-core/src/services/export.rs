//! Journal export - renders a user's garden journal as a PDF
//!
//! The document is built straight from low-level PDF objects: one embedded
//! Helvetica font, one content stream per page, uncompressed text streams.

use std::sync::Arc;

use pdf_writer::{Content, Finish, Name, Pdf, Rect, Ref, Str};
use uuid::Uuid;

use crate::domain::result::Result;
use crate::domain::Plant;
use crate::ports::Repository;

const PAGE_WIDTH: f32 = 595.0;
const PAGE_HEIGHT: f32 = 842.0;
const MARGIN: f32 = 50.0;
const LINE_GAP: f32 = 6.0;

const TITLE_SIZE: f32 = 18.0;
const HEADING_SIZE: f32 = 14.0;
const BODY_SIZE: f32 = 12.0;

/// Renders export documents for a user's plant collection.
#[derive(Clone)]
pub struct ExportService {
    repository: Arc<dyn Repository>,
}

impl ExportService {
    pub fn new(repository: Arc<dyn Repository>) -> Self {
        Self { repository }
    }

    /// Render every plant the owner has, with care tips and journal
    /// entries, into a single PDF document.
    pub async fn journal_pdf(&self, owner: Uuid) -> Result<Vec<u8>> {
        let plants = self.repository.plants_for_owner(owner).await?;
        Ok(render_journal(&plants))
    }
}

fn render_journal(plants: &[Plant]) -> Vec<u8> {
    let mut doc = JournalPdf::new();
    doc.centered(TITLE_SIZE, "Your Garden Journal");

    for plant in plants {
        doc.gap();
        doc.line(HEADING_SIZE, &format!("Plant Name: {}", plant.name));
        doc.line(
            BODY_SIZE,
            &format!("Scientific Name: {}", or_na(&plant.scientific_name)),
        );
        let planted = plant
            .planted_date
            .map(|d| d.format("%Y-%m-%d").to_string());
        doc.line(
            BODY_SIZE,
            &format!("Planted Date: {}", or_na(planted.as_deref().unwrap_or(""))),
        );

        doc.gap();
        doc.line(BODY_SIZE, "Care Tips:");
        let tips = &plant.care_tips;
        doc.line(BODY_SIZE, &format!("  Light: {}", opt_or_na(&tips.light)));
        doc.line(BODY_SIZE, &format!("  Water: {}", opt_or_na(&tips.water)));
        doc.line(
            BODY_SIZE,
            &format!("  Temperature: {}", opt_or_na(&tips.temperature)),
        );
        doc.line(BODY_SIZE, &format!("  Soil: {}", opt_or_na(&tips.soil)));

        doc.gap();
        if plant.journal_entries.is_empty() {
            doc.line(BODY_SIZE, "No journal entries for this plant.");
            doc.gap();
        } else {
            doc.line(BODY_SIZE, "Journal Entries:");
            for entry in &plant.journal_entries {
                doc.line(
                    BODY_SIZE,
                    &format!("  Date: {}", entry.timestamp.format("%Y-%m-%d")),
                );
                doc.line(BODY_SIZE, &format!("  Notes: {}", entry.notes));
                if let Some(photo) = &entry.photo_url {
                    doc.line(BODY_SIZE, &format!("  Photo: {photo}"));
                }
                doc.gap();
            }
        }
    }

    doc.finish()
}

fn or_na(value: &str) -> &str {
    if value.is_empty() {
        "N/A"
    } else {
        value
    }
}

fn opt_or_na(value: &Option<String>) -> &str {
    or_na(value.as_deref().unwrap_or(""))
}

/// Incremental page-by-page writer. Text flows top to bottom; a line
/// that would cross the bottom margin starts a new page.
struct JournalPdf {
    pdf: Pdf,
    next_id: i32,
    page_tree: Ref,
    font: Ref,
    pages: Vec<Ref>,
    content: Content,
    y: f32,
}

impl JournalPdf {
    fn new() -> Self {
        Self {
            pdf: Pdf::new(),
            next_id: 4,
            page_tree: Ref::new(2),
            font: Ref::new(3),
            pages: Vec::new(),
            content: Content::new(),
            y: PAGE_HEIGHT - MARGIN,
        }
    }

    fn alloc(&mut self) -> Ref {
        let id = Ref::new(self.next_id);
        self.next_id += 1;
        id
    }

    /// Horizontally centered line, used for the document title.
    fn centered(&mut self, size: f32, text: &str) {
        // Helvetica averages about half an em per glyph; close enough
        // for a title.
        let width = text.len() as f32 * size * 0.5;
        let x = ((PAGE_WIDTH - width) / 2.0).max(MARGIN);
        self.line_at(size, x, text);
    }

    fn line(&mut self, size: f32, text: &str) {
        self.line_at(size, MARGIN, text);
    }

    fn line_at(&mut self, size: f32, x: f32, text: &str) {
        if self.y - (size + LINE_GAP) < MARGIN {
            self.flush_page();
        }
        self.y -= size + LINE_GAP;
        self.content.begin_text();
        self.content.set_font(Name(b"F1"), size);
        self.content.next_line(x, self.y);
        self.content.show(Str(text.as_bytes()));
        self.content.end_text();
    }

    fn gap(&mut self) {
        self.y -= BODY_SIZE;
    }

    /// Close out the content written so far as one page.
    fn flush_page(&mut self) {
        let content = std::mem::replace(&mut self.content, Content::new());
        let content_id = self.alloc();
        self.pdf.stream(content_id, &content.finish());

        let page_id = self.alloc();
        let mut page = self.pdf.page(page_id);
        page.media_box(Rect::new(0.0, 0.0, PAGE_WIDTH, PAGE_HEIGHT));
        page.parent(self.page_tree);
        page.contents(content_id);
        page.resources().fonts().pair(Name(b"F1"), self.font);
        page.finish();

        self.pages.push(page_id);
        self.y = PAGE_HEIGHT - MARGIN;
    }

    fn finish(mut self) -> Vec<u8> {
        self.flush_page();
        self.pdf.catalog(Ref::new(1)).pages(self.page_tree);
        self.pdf
            .pages(self.page_tree)
            .kids(self.pages.iter().copied())
            .count(self.pages.len() as i32);
        self.pdf.type1_font(self.font).base_font(Name(b"Helvetica"));
        self.pdf.finish()
    }
}
