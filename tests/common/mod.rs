#![allow(dead_code)]

use cranio_deck::SyndromeRecord;
use image::{ImageBuffer, ImageFormat, Rgb};
use quick_xml::events::Event;
use quick_xml::Reader;
use std::collections::HashMap;
use std::fs;
use std::io::{Cursor, Read};
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;
use tiny_http::{Header, Response, Server};
use zip::ZipArchive;

/// Lookup title that makes the mock answer with a body that is not JSON.
pub const MALFORMED_TITLE: &str = "Malformed Syndrome";
/// Lookup title that makes the mock answer with HTTP 500.
pub const FAILING_TITLE: &str = "Failing Syndrome";

/// PNG bytes of a 40x20 image.
pub fn png_bytes() -> Vec<u8> {
    let img = ImageBuffer::from_fn(40, 20, |x, _| Rgb([(x * 6) as u8, 0u8, 128u8]));
    let mut bytes = Cursor::new(Vec::new());
    img.write_to(&mut bytes, ImageFormat::Png)
        .expect("Failed to encode PNG");
    bytes.into_inner()
}

/// Stand-in for both the image host and the page-image lookup service.
///
/// Routes:
/// - `/images/<any>.png` returns a PNG
/// - `/slow.png` answers after three seconds
/// - `/w/api.php?titles=<t>` returns a thumbnail when `<t>` is registered
/// - anything else is a 404
pub struct MockServer {
    pub base_url: String,
    requests: Arc<Mutex<Vec<String>>>,
    server: Arc<Server>,
}

impl MockServer {
    /// `pages` maps a lookup title to the canonical page title returned for it.
    pub fn start(pages: &[(&str, &str)]) -> Self {
        let server = Arc::new(Server::http("127.0.0.1:0").expect("Failed to start mock server"));
        let addr = server
            .server_addr()
            .to_ip()
            .expect("Mock server is not listening on IP");
        let base_url = format!("http://{}", addr);

        let pages: Arc<HashMap<String, String>> = Arc::new(
            pages
                .iter()
                .map(|(title, canonical)| (title.to_string(), canonical.to_string()))
                .collect(),
        );
        let requests = Arc::new(Mutex::new(Vec::new()));

        {
            let server = Arc::clone(&server);
            let requests = Arc::clone(&requests);
            let base_url = base_url.clone();
            thread::spawn(move || {
                for request in server.incoming_requests() {
                    let pages = Arc::clone(&pages);
                    let requests = Arc::clone(&requests);
                    let base_url = base_url.clone();
                    thread::spawn(move || {
                        let url = request.url().to_string();
                        requests.lock().unwrap().push(url.clone());
                        let response = route(&url, &base_url, &pages);
                        let _ = request.respond(response);
                    });
                }
            });
        }

        Self {
            base_url,
            requests,
            server,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn lookup_endpoint(&self) -> String {
        self.url("/w/api.php")
    }

    /// Request paths (with query strings) seen so far, in arrival order.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    pub fn lookup_count(&self) -> usize {
        self.requests()
            .iter()
            .filter(|r| r.starts_with("/w/api.php"))
            .count()
    }
}

impl Drop for MockServer {
    fn drop(&mut self) {
        self.server.unblock();
    }
}

fn route(url: &str, base_url: &str, pages: &HashMap<String, String>) -> Response<Cursor<Vec<u8>>> {
    let parsed = url::Url::parse(&format!("http://localhost{}", url)).expect("Bad request URL");

    match parsed.path() {
        "/slow.png" => {
            thread::sleep(Duration::from_secs(3));
            Response::from_data(png_bytes())
        }
        path if path.starts_with("/images/") => Response::from_data(png_bytes()),
        "/w/api.php" => {
            let title = parsed
                .query_pairs()
                .find(|(k, _)| k == "titles")
                .map(|(_, v)| v.into_owned())
                .unwrap_or_default();

            if title == MALFORMED_TITLE {
                return Response::from_string("<html>not json</html>");
            }
            if title == FAILING_TITLE {
                return Response::from_string("boom").with_status_code(500);
            }

            let body = match pages.get(&title) {
                Some(canonical) => serde_json::json!({
                    "batchcomplete": "",
                    "query": {"pages": {"4242": {
                        "pageid": 4242,
                        "ns": 0,
                        "title": canonical,
                        "thumbnail": {
                            "source": format!("{}/images/thumb_4242.png", base_url),
                            "width": 40,
                            "height": 20
                        },
                        "pageimage": "Thumb.png"
                    }}}
                }),
                None => serde_json::json!({
                    "batchcomplete": "",
                    "query": {"pages": {"-1": {"ns": 0, "title": title, "missing": ""}}}
                }),
            };
            Response::from_string(body.to_string()).with_header(
                Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..]).unwrap(),
            )
        }
        _ => Response::from_string("not found").with_status_code(404),
    }
}

/// Give a runtime string the lifetime the dataset types expect.
pub fn leak(s: String) -> &'static str {
    Box::leak(s.into_boxed_str())
}

pub fn record(name: &'static str, image_url: Option<String>) -> SyndromeRecord {
    SyndromeRecord {
        name,
        description: "Test description.",
        anesthesia: &["First point", "Second point"],
        image_url: image_url.map(leak),
        image_caption: "Test caption (Wikimedia Commons)",
    }
}

/// Contents of a PPTX, read back for assertions.
pub struct PptxContents {
    pub slides: Vec<String>,
    pub media: Vec<String>,
}

impl PptxContents {
    /// Text runs of slide `index` (0-based).
    pub fn texts(&self, index: usize) -> Vec<String> {
        slide_texts(&self.slides[index])
    }

    pub fn has_picture(&self, index: usize) -> bool {
        self.slides[index].contains("<p:pic>")
    }
}

pub fn read_pptx(path: &Path) -> PptxContents {
    let file = fs::File::open(path).expect("Failed to open PPTX file");
    let mut archive = ZipArchive::new(file).expect("Failed to read PPTX as ZIP");

    let names: Vec<String> = archive.file_names().map(|n| n.to_string()).collect();
    let slide_count = names
        .iter()
        .filter(|n| n.starts_with("ppt/slides/slide") && n.ends_with(".xml"))
        .count();

    let mut slides = Vec::with_capacity(slide_count);
    for n in 1..=slide_count {
        let mut xml = String::new();
        archive
            .by_name(&format!("ppt/slides/slide{}.xml", n))
            .expect("Missing slide part")
            .read_to_string(&mut xml)
            .expect("Slide is not UTF-8");
        slides.push(xml);
    }

    let mut media: Vec<String> = names
        .into_iter()
        .filter(|n| n.starts_with("ppt/media/"))
        .collect();
    media.sort();

    PptxContents { slides, media }
}

/// Collect every `<a:t>` run in a slide.
pub fn slide_texts(xml: &str) -> Vec<String> {
    let mut reader = Reader::from_str(xml);
    let mut texts = Vec::new();
    let mut in_text = false;
    loop {
        match reader.read_event().expect("Invalid slide XML") {
            Event::Start(e) if e.name().as_ref() == b"a:t" => in_text = true,
            Event::End(e) if e.name().as_ref() == b"a:t" => in_text = false,
            Event::Text(t) if in_text => texts.push(t.unescape().expect("Bad escape").into_owned()),
            Event::Eof => break,
            _ => {}
        }
    }
    texts
}
