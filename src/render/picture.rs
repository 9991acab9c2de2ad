//! PNG rendering of a computed table.
//!
//! Text is drawn from 8x8 bitmap glyphs scaled up by whole pixels, so the picture looks the
//! same everywhere without a font file. Characters without a glyph are drawn as a hollow box.

use crate::error::CourtTallyError;
use crate::ledger::Table;
use font8x8::{UnicodeFonts, BASIC_FONTS, BLOCK_FONTS, BOX_FONTS, GREEK_FONTS, LATIN_FONTS, MISC_FONTS};
use image::{ImageFormat, Rgb, RgbImage};
use std::io::Cursor;
use tracing::debug;

const GLYPH_SIZE: u32 = 8;
const MISSING_GLYPH: [u8; 8] = [0xFF, 0x81, 0x81, 0x81, 0x81, 0x81, 0x81, 0xFF];

/// Scale of cell text, 16 pixels per character.
const TEXT_SCALE: u32 = 2;
/// Scale of the title, 24 pixels per character.
const TITLE_SCALE: u32 = 3;

const MARGIN: u32 = 20;
const COLUMN_PADDING: u32 = 10;
/// Extra space below each data row.
const ROW_SPACING: u32 = 5;
/// Gap between the title and the date.
const DATE_GAP: u32 = 20;
const BOX_PADDING: u32 = 5;
const BOX_BORDER: u32 = 2;

const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
const BLACK: Rgb<u8> = Rgb([0, 0, 0]);
const RED: Rgb<u8> = Rgb([220, 0, 0]);

fn glyph(character: char) -> [u8; 8] {
    BASIC_FONTS
        .get(character)
        .or_else(|| LATIN_FONTS.get(character))
        .or_else(|| GREEK_FONTS.get(character))
        .or_else(|| BOX_FONTS.get(character))
        .or_else(|| BLOCK_FONTS.get(character))
        .or_else(|| MISC_FONTS.get(character))
        .unwrap_or(MISSING_GLYPH)
}

/// Width in pixels of `text` drawn at `scale`.
fn text_width(text: &str, scale: u32) -> u32 {
    text.chars().count() as u32 * GLYPH_SIZE * scale
}

struct Canvas {
    image: RgbImage,
}

impl Canvas {
    fn new(width: u32, height: u32) -> Self {
        Canvas {
            image: RgbImage::from_pixel(width, height, WHITE),
        }
    }

    /// Fills a rectangle, clipped to the image.
    fn fill(&mut self, x: u32, y: u32, width: u32, height: u32, color: Rgb<u8>) {
        let right = (x + width).min(self.image.width());
        let bottom = (y + height).min(self.image.height());
        for py in y..bottom {
            for px in x..right {
                self.image.put_pixel(px, py, color);
            }
        }
    }

    /// Draws the outline of a rectangle, `border` pixels thick, inside its bounds.
    fn outline(&mut self, x: u32, y: u32, width: u32, height: u32, border: u32, color: Rgb<u8>) {
        self.fill(x, y, width, border, color);
        self.fill(x, y + height.saturating_sub(border), width, border, color);
        self.fill(x, y, border, height, color);
        self.fill(x + width.saturating_sub(border), y, border, height, color);
    }

    fn text(&mut self, x: u32, y: u32, text: &str, scale: u32) {
        for (index, character) in text.chars().enumerate() {
            let left = x + index as u32 * GLYPH_SIZE * scale;
            for (row, bits) in glyph(character).iter().enumerate() {
                for col in 0..GLYPH_SIZE {
                    if bits >> col & 1 == 1 {
                        self.fill(left + col * scale, y + row as u32 * scale, scale, scale, BLACK);
                    }
                }
            }
        }
    }
}

/// Draws `table` as a PNG: `title` top left, `date_text` in a red box to its right, then
/// the column labels and every row in aligned columns.
pub fn render_png(table: &Table, title: &str, date_text: &str) -> Result<Vec<u8>, CourtTallyError> {
    let labels = table.labels();
    let records = table.to_records();
    let widths: Vec<u32> = labels
        .iter()
        .enumerate()
        .map(|(col, label)| {
            records
                .iter()
                .map(|record| text_width(&record[col], TEXT_SCALE))
                .fold(text_width(label, TEXT_SCALE), u32::max)
        })
        .collect();

    let line_height = GLYPH_SIZE * TEXT_SCALE;
    let header_height = line_height + COLUMN_PADDING;
    let row_height = line_height + ROW_SPACING;
    let title_width = text_width(title, TITLE_SCALE);
    let title_height = GLYPH_SIZE * TITLE_SCALE;
    let date_width = text_width(date_text, TEXT_SCALE);

    let table_width = widths.iter().sum::<u32>() + (widths.len() as u32 + 1) * COLUMN_PADDING;
    let heading_width = title_width + DATE_GAP + date_width + BOX_PADDING;
    let width = table_width.max(heading_width) + 2 * MARGIN;
    let height = title_height + line_height + 20 + header_height + records.len() as u32 * row_height + 2 * MARGIN;
    let mut canvas = Canvas::new(width, height);

    canvas.text(MARGIN, MARGIN, title, TITLE_SCALE);
    let date_x = MARGIN + title_width + DATE_GAP;
    let date_y = MARGIN + (title_height - line_height) / 2;
    canvas.text(date_x, date_y, date_text, TEXT_SCALE);
    canvas.outline(
        date_x - BOX_PADDING,
        date_y - BOX_PADDING,
        date_width + 2 * BOX_PADDING,
        line_height + 2 * BOX_PADDING,
        BOX_BORDER,
        RED,
    );

    let mut y = MARGIN + title_height + 10;
    let draw_line = |canvas: &mut Canvas, cells: &[String], y: u32| {
        let mut x = MARGIN;
        for (cell, width) in cells.iter().zip(widths.iter()) {
            canvas.text(x, y, cell, TEXT_SCALE);
            x += width + COLUMN_PADDING;
        }
    };
    draw_line(&mut canvas, labels.as_slice(), y);
    y += header_height;
    for record in &records {
        draw_line(&mut canvas, record.as_slice(), y);
        y += row_height;
    }

    let mut bytes = Vec::<u8>::new();
    canvas.image.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
    debug!(width, height, size = bytes.len(), "table picture encoded");
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::{compute_table, last_active_row_index, template, PricingParameters, TallyRules};

    fn decode(bytes: &[u8]) -> RgbImage {
        image::load_from_memory_with_format(bytes, ImageFormat::Png).unwrap().to_rgb8()
    }

    fn computed() -> Table {
        let input = template();
        let last = last_active_row_index(&input);
        compute_table(&input, &PricingParameters::default(), &TallyRules::default(), last).0
    }

    #[test]
    fn png_signature_and_size() {
        let table = computed();
        let bytes = render_png(&table, "Club", "19/10/2026").unwrap();
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");

        let picture = decode(&bytes);
        let rows = table.rows.len() as u32;
        assert_eq!(picture.height(), 24 + 16 + 20 + 26 + rows * 21 + 40);
        assert!(picture.width() > 24 * COLUMN_PADDING);
        assert_eq!(*picture.get_pixel(0, 0), WHITE);
    }

    #[test]
    fn date_is_boxed_in_red() {
        let picture = decode(&render_png(&computed(), "Club", "19/10/2026").unwrap());
        let date_x = MARGIN + 4 * 24 + DATE_GAP;
        let date_y = MARGIN + (24 - 16) / 2;
        let (left, top) = (date_x - BOX_PADDING, date_y - BOX_PADDING);
        let right = date_x + 10 * 16 + BOX_PADDING - 1;
        let bottom = date_y + 16 + BOX_PADDING - 1;
        for (x, y) in [(left, top), (right, top), (left, bottom), (right, bottom)] {
            assert_eq!(*picture.get_pixel(x, y), RED, "corner ({x}, {y})");
        }
        assert_ne!(*picture.get_pixel(left + BOX_BORDER, top + BOX_BORDER + 1), RED);
    }

    #[test]
    fn header_and_cells_are_drawn() {
        let picture = decode(&render_png(&computed(), "Club", "d").unwrap());
        let inked = |x0: u32, y0: u32| {
            (x0..x0 + 16).any(|x| (y0..y0 + 16).any(|y| *picture.get_pixel(x, y) == BLACK))
        };
        let header_y = MARGIN + 24 + 10;
        assert!(inked(MARGIN, header_y));
        assert!(inked(MARGIN, header_y + 26));
        assert!(!inked(MARGIN, header_y + 26 + 12 * 21));
    }

    #[test]
    fn unknown_characters_get_a_box() {
        assert_eq!(glyph('ก'), MISSING_GLYPH);
        assert_ne!(glyph('A'), MISSING_GLYPH);
        assert_eq!(glyph(' '), [0; 8]);
    }

    #[test]
    fn long_title_widens_picture() {
        let table = Table::default();
        let picture = decode(&render_png(&table, &"T".repeat(120), "d").unwrap());
        assert_eq!(picture.width(), 120 * 24 + DATE_GAP + 16 + BOX_PADDING + 2 * MARGIN);
    }
}
