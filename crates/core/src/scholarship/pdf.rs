use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};

use super::{email_body, ScholarshipApplication, ScholarshipError};

/// US Letter, in points.
const PAGE_WIDTH: i64 = 612;
const PAGE_HEIGHT: i64 = 792;
const MARGIN: i64 = 54;
const FONT_SIZE: i64 = 10;
const LEADING: i64 = 14;
const LINES_PER_PAGE: usize = ((PAGE_HEIGHT - 2 * MARGIN) / LEADING) as usize;
/// Helvetica at 10pt fits roughly this many characters between the margins.
const MAX_LINE_CHARS: usize = 95;

/// Renders the application as a plain text PDF in Helvetica.
pub fn render_application_pdf(app: &ScholarshipApplication) -> Result<Vec<u8>, ScholarshipError> {
    let lines = layout_lines(&email_body(app));

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => font_id,
        },
    });

    let mut kids: Vec<Object> = Vec::new();
    for page_lines in lines.chunks(LINES_PER_PAGE) {
        let mut operations = vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec!["F1".into(), FONT_SIZE.into()]),
            Operation::new("TL", vec![LEADING.into()]),
            Operation::new("Td", vec![MARGIN.into(), (PAGE_HEIGHT - MARGIN).into()]),
        ];
        for line in page_lines {
            operations.push(Operation::new(
                "Tj",
                vec![Object::string_literal(win_ansi(line))],
            ));
            operations.push(Operation::new("T*", vec![]));
        }
        operations.push(Operation::new("ET", vec![]));

        let content = Content { operations }
            .encode()
            .map_err(|e| ScholarshipError::Pdf(e.to_string()))?;
        let content_id = doc.add_object(Stream::new(dictionary! {}, content));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let page_count = kids.len() as i64;
    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => page_count,
        "Resources" => resources_id,
        "MediaBox" => vec![0.into(), 0.into(), PAGE_WIDTH.into(), PAGE_HEIGHT.into()],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.compress();

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)
        .map_err(|e| ScholarshipError::Pdf(e.to_string()))?;
    Ok(bytes)
}

/// Splits text into lines no longer than [`MAX_LINE_CHARS`], wrapping at
/// spaces where possible.
fn layout_lines(text: &str) -> Vec<String> {
    let mut lines = Vec::new();

    for paragraph in text.lines() {
        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            let mut word = word;
            while word.chars().count() > MAX_LINE_CHARS {
                if !current.is_empty() {
                    lines.push(std::mem::take(&mut current));
                }
                let split = word
                    .char_indices()
                    .nth(MAX_LINE_CHARS)
                    .map_or(word.len(), |(idx, _)| idx);
                lines.push(word[..split].to_string());
                word = &word[split..];
            }
            if word.is_empty() {
                continue;
            }

            let needed = current.chars().count() + word.chars().count() + 1;
            if !current.is_empty() && needed > MAX_LINE_CHARS {
                lines.push(std::mem::take(&mut current));
            }
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(word);
        }
        lines.push(current);
    }

    lines
}

/// Encodes text for a WinAnsi Type1 font. Characters outside Latin-1 become `?`.
fn win_ansi(line: &str) -> Vec<u8> {
    line.chars()
        .map(|c| u8::try_from(u32::from(c)).unwrap_or(b'?'))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_a_loadable_pdf() {
        let app = ScholarshipApplication {
            student_name: "Jane Doe".into(),
            question1: "Community outreach".into(),
            ..Default::default()
        };

        let bytes = render_application_pdf(&app).unwrap();

        assert!(bytes.starts_with(b"%PDF-1.5"));
        let doc = Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 1);
    }

    #[test]
    fn long_applications_span_several_pages() {
        let app = ScholarshipApplication {
            question3: "word ".repeat(20_000),
            ..Default::default()
        };

        let bytes = render_application_pdf(&app).unwrap();

        let doc = Document::load_mem(&bytes).unwrap();
        assert!(doc.get_pages().len() > 1);
    }

    #[test]
    fn layout_wraps_at_word_boundaries() {
        let text = format!("{} tail", "a".repeat(MAX_LINE_CHARS - 2));
        let lines = layout_lines(&text);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1], "tail");
    }

    #[test]
    fn layout_splits_overlong_words_and_keeps_blank_lines() {
        let text = format!("{}\n\nend", "x".repeat(MAX_LINE_CHARS + 5));
        let lines = layout_lines(&text);
        assert_eq!(lines, vec!["x".repeat(MAX_LINE_CHARS), "x".repeat(5), String::new(), "end".to_string()]);
    }

    #[test]
    fn win_ansi_replaces_non_latin_characters() {
        assert_eq!(win_ansi("Café 李"), b"Caf\xe9 ?".to_vec());
    }
}
