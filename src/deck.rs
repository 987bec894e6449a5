// ABOUTME: In-memory slide deck model for the cranio-deck application
// ABOUTME: Builds the title, per-syndrome and references slides with fixed geometry

use crate::dataset::{SyndromeRecord, REFERENCES_TITLE};
use crate::errors::{DeckError, Result};
use crate::resolver::ResolvedImage;
use image::io::Reader as ImageReader;
use image::ImageFormat;
use log::{info, warn};
use std::fs;
use std::path::Path;

/// English Metric Units per inch.
pub const EMU_PER_INCH: i64 = 914_400;

/// Slide size for the 4:3 "screen" layout.
pub const SLIDE_WIDTH: i64 = 10 * EMU_PER_INCH;
pub const SLIDE_HEIGHT: i64 = 7 * EMU_PER_INCH + EMU_PER_INCH / 2;

pub const BODY_FONT_PT: u32 = 18;
pub const CAPTION_FONT_PT: u32 = 10;
pub const REFERENCE_FONT_PT: u32 = 12;

/// Convert inches to EMU.
pub fn inches(value: f64) -> i64 {
    (value * EMU_PER_INCH as f64).round() as i64
}

/// Position and size of a shape, in EMU.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: i64,
    pub y: i64,
    pub width: i64,
    pub height: i64,
}

impl Rect {
    pub fn new(x: i64, y: i64, width: i64, height: i64) -> Self {
        Self { x, y, width, height }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paragraph {
    pub text: String,
    /// Indent level, 0 for top level
    pub level: u8,
    /// Font size in points; `None` inherits from the master
    pub font_size: Option<u32>,
}

impl Paragraph {
    pub fn new(text: impl Into<String>, level: u8, font_size: Option<u32>) -> Self {
        Self {
            text: text.into(),
            level,
            font_size,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextFrame {
    pub paragraphs: Vec<Paragraph>,
    pub word_wrap: bool,
}

impl TextFrame {
    pub fn new(paragraphs: Vec<Paragraph>, word_wrap: bool) -> Self {
        Self {
            paragraphs,
            word_wrap,
        }
    }

    pub fn single(text: impl Into<String>, font_size: Option<u32>) -> Self {
        Self::new(vec![Paragraph::new(text, 0, font_size)], true)
    }

    /// Paragraph texts joined by newlines.
    pub fn plain_text(&self) -> String {
        self.paragraphs
            .iter()
            .map(|p| p.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceholderKind {
    CenteredTitle,
    Subtitle,
    Title,
    Body,
}

/// Raster formats that can be embedded in the package.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaFormat {
    Png,
    Jpeg,
    Gif,
    Bmp,
    Tiff,
}

impl MediaFormat {
    pub const ALL: [MediaFormat; 5] = [
        MediaFormat::Png,
        MediaFormat::Jpeg,
        MediaFormat::Gif,
        MediaFormat::Bmp,
        MediaFormat::Tiff,
    ];

    pub fn from_image_format(format: ImageFormat) -> Option<Self> {
        match format {
            ImageFormat::Png => Some(MediaFormat::Png),
            ImageFormat::Jpeg => Some(MediaFormat::Jpeg),
            ImageFormat::Gif => Some(MediaFormat::Gif),
            ImageFormat::Bmp => Some(MediaFormat::Bmp),
            ImageFormat::Tiff => Some(MediaFormat::Tiff),
            _ => None,
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            MediaFormat::Png => "png",
            MediaFormat::Jpeg => "jpeg",
            MediaFormat::Gif => "gif",
            MediaFormat::Bmp => "bmp",
            MediaFormat::Tiff => "tiff",
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            MediaFormat::Png => "image/png",
            MediaFormat::Jpeg => "image/jpeg",
            MediaFormat::Gif => "image/gif",
            MediaFormat::Bmp => "image/bmp",
            MediaFormat::Tiff => "image/tiff",
        }
    }
}

/// Image bytes carried by a picture shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbeddedImage {
    pub data: Vec<u8>,
    pub format: MediaFormat,
    pub pixel_width: u32,
    pub pixel_height: u32,
}

impl EmbeddedImage {
    /// Read and sniff an image file.
    pub fn load(path: &Path) -> Result<Self> {
        let data = fs::read(path)?;
        let reader = ImageReader::new(std::io::Cursor::new(data.as_slice())).with_guessed_format()?;
        let format = reader
            .format()
            .and_then(MediaFormat::from_image_format)
            .ok_or_else(|| {
                DeckError::ImageError(format!("Unsupported image format: {:?}", path))
            })?;
        let (pixel_width, pixel_height) = reader.into_dimensions()?;
        if pixel_width == 0 || pixel_height == 0 {
            return Err(DeckError::ImageError(format!(
                "Image has no pixels: {:?}",
                path
            )));
        }

        Ok(Self {
            data,
            format,
            pixel_width,
            pixel_height,
        })
    }

    /// Height in EMU that keeps the aspect ratio at the given width.
    pub fn scaled_height(&self, width: i64) -> i64 {
        (width as f64 * self.pixel_height as f64 / self.pixel_width as f64).round() as i64
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Shape {
    Placeholder {
        kind: PlaceholderKind,
        frame: Rect,
        text: TextFrame,
    },
    TextBox {
        frame: Rect,
        text: TextFrame,
    },
    Picture {
        frame: Rect,
        image: EmbeddedImage,
        description: String,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Slide {
    pub shapes: Vec<Shape>,
}

impl Slide {
    /// Text of the title placeholder, if any.
    pub fn title(&self) -> Option<&str> {
        self.shapes.iter().find_map(|shape| match shape {
            Shape::Placeholder {
                kind: PlaceholderKind::Title | PlaceholderKind::CenteredTitle,
                text,
                ..
            } => text.paragraphs.first().map(|p| p.text.as_str()),
            _ => None,
        })
    }

    pub fn pictures(&self) -> impl Iterator<Item = &EmbeddedImage> {
        self.shapes.iter().filter_map(|shape| match shape {
            Shape::Picture { image, .. } => Some(image),
            _ => None,
        })
    }

    pub fn has_picture(&self) -> bool {
        self.pictures().next().is_some()
    }

    /// Every paragraph on the slide, in shape order.
    pub fn texts(&self) -> Vec<&str> {
        self.shapes
            .iter()
            .filter_map(|shape| match shape {
                Shape::Placeholder { text, .. } | Shape::TextBox { text, .. } => Some(text),
                Shape::Picture { .. } => None,
            })
            .flat_map(|frame| frame.paragraphs.iter().map(|p| p.text.as_str()))
            .collect()
    }
}

fn title_frame() -> Rect {
    Rect::new(inches(0.5), inches(0.3), inches(9.0), inches(0.8))
}

/// Geometry of the description/anesthesia text box.
pub fn record_text_frame() -> Rect {
    Rect::new(inches(0.5), inches(1.2), inches(5.5), inches(4.5))
}

const PICTURE_LEFT_IN: f64 = 6.2;
const PICTURE_TOP_IN: f64 = 1.2;
const PICTURE_WIDTH_IN: f64 = 3.0;
const CAPTION_OFFSET_IN: f64 = 3.05;

/// An ordered sequence of slides.
#[derive(Debug, Clone, Default)]
pub struct Deck {
    slides: Vec<Slide>,
}

impl Deck {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn slides(&self) -> &[Slide] {
        &self.slides
    }

    pub fn slide_count(&self) -> usize {
        self.slides.len()
    }

    fn push(&mut self, slide: Slide) -> &Slide {
        self.slides.push(slide);
        &self.slides[self.slides.len() - 1]
    }

    /// Append the opening slide with a centred title and subtitle.
    pub fn add_title_slide(&mut self, title: &str, subtitle: &str) -> &Slide {
        let slide = Slide {
            shapes: vec![
                Shape::Placeholder {
                    kind: PlaceholderKind::CenteredTitle,
                    frame: Rect::new(inches(0.75), inches(2.33), inches(8.5), inches(1.61)),
                    text: TextFrame::single(title, None),
                },
                Shape::Placeholder {
                    kind: PlaceholderKind::Subtitle,
                    frame: Rect::new(inches(1.5), inches(4.25), inches(7.0), inches(1.92)),
                    text: TextFrame::single(subtitle, None),
                },
            ],
        };
        self.push(slide)
    }

    /// Append the slide for one syndrome record.
    ///
    /// The picture and its caption are added only when the resolved image exists on
    /// disk and can be decoded; the text box is laid out the same either way.
    pub fn add_record_slide(&mut self, record: &SyndromeRecord, resolved: &ResolvedImage) -> &Slide {
        let mut paragraphs = Vec::with_capacity(record.anesthesia.len() + 1);
        paragraphs.push(Paragraph::new(record.description, 0, Some(BODY_FONT_PT)));
        for point in record.anesthesia {
            paragraphs.push(Paragraph::new(format!("- {}", point), 1, Some(BODY_FONT_PT)));
        }

        let mut shapes = vec![
            Shape::Placeholder {
                kind: PlaceholderKind::Title,
                frame: title_frame(),
                text: TextFrame::single(record.name, None),
            },
            Shape::TextBox {
                frame: record_text_frame(),
                text: TextFrame::new(paragraphs, true),
            },
        ];

        if let Some(image) = resolved.path().and_then(load_picture) {
            let left = inches(PICTURE_LEFT_IN);
            let top = inches(PICTURE_TOP_IN);
            let width = inches(PICTURE_WIDTH_IN);
            let height = image.scaled_height(width);

            shapes.push(Shape::Picture {
                frame: Rect::new(left, top, width, height),
                image,
                description: record.image_caption.to_string(),
            });
            shapes.push(Shape::TextBox {
                frame: Rect::new(left, top + inches(CAPTION_OFFSET_IN), width, inches(1.0)),
                text: TextFrame::single(record.image_caption, Some(CAPTION_FONT_PT)),
            });
        }

        self.push(Slide { shapes })
    }

    /// Append the closing slide listing every reference in order.
    pub fn add_references_slide(&mut self, entries: &[String]) -> &Slide {
        let paragraphs = entries
            .iter()
            .map(|entry| Paragraph::new(entry.as_str(), 0, Some(REFERENCE_FONT_PT)))
            .collect();

        let slide = Slide {
            shapes: vec![
                Shape::Placeholder {
                    kind: PlaceholderKind::Title,
                    frame: title_frame(),
                    text: TextFrame::single(REFERENCES_TITLE, None),
                },
                Shape::Placeholder {
                    kind: PlaceholderKind::Body,
                    frame: Rect::new(inches(0.5), inches(1.75), inches(9.0), inches(4.95)),
                    text: TextFrame::new(paragraphs, true),
                },
            ],
        };
        self.push(slide)
    }
}

fn load_picture(path: &Path) -> Option<EmbeddedImage> {
    if !path.is_file() {
        warn!("Image file missing, leaving slide without picture: {:?}", path);
        return None;
    }
    match EmbeddedImage::load(path) {
        Ok(image) => {
            info!(
                "Embedding {:?} ({}x{} {})",
                path,
                image.pixel_width,
                image.pixel_height,
                image.format.extension()
            );
            Some(image)
        }
        Err(e) => {
            warn!("Failed to load image {:?}: {}", path, e);
            None
        }
    }
}
