use lopdf::Document;

/// Page dimensions in PDF points (1/72 inch).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSize {
    pub width: f64,
    pub height: f64,
}

impl Default for PageSize {
    fn default() -> Self {
        Self { width: 612.0, height: 792.0 }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PdfPagesError {
    #[error("PDF parse error: {0}")]
    Parse(#[from] lopdf::Error),
    #[error("page {page} out of range (page_count={page_count})")]
    PageOutOfRange { page: u32, page_count: u32 },
    #[error("encrypted PDFs are not supported")]
    Encrypted,
    #[error("document has no pages")]
    NoPages,
}

/// Page geometry reported by the document renderer.
///
/// The viewer only needs page count and per-page dimensions to anchor pins;
/// rasterization stays in the host renderer.
pub trait PageSource {
    fn page_count(&self) -> u32;
    fn page_bounds(&self, page_index: u32) -> Result<PageSize, PdfPagesError>;
}

/// Page geometry extracted from PDF bytes with lopdf.
#[derive(Debug, Clone)]
pub struct LopdfPages {
    sizes: Vec<PageSize>,
}

impl LopdfPages {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PdfPagesError> {
        if bytes.windows("/Encrypt".len()).any(|window| window == b"/Encrypt") {
            return Err(PdfPagesError::Encrypted);
        }

        let doc = Document::load_mem(bytes)?;
        let pages = doc.get_pages();
        let mut sizes = Vec::with_capacity(pages.len());

        for (_, object_id) in pages {
            let dict = doc.get_dictionary(object_id)?;
            let size = dict
                .get(b"MediaBox")
                .ok()
                .and_then(|obj| obj.as_array().ok())
                .and_then(|array| {
                    if array.len() != 4 {
                        return None;
                    }
                    let x0 = array[0].as_float().ok()?;
                    let y0 = array[1].as_float().ok()?;
                    let x1 = array[2].as_float().ok()?;
                    let y1 = array[3].as_float().ok()?;
                    Some(PageSize {
                        width: (x1 - x0).abs() as f64,
                        height: (y1 - y0).abs() as f64,
                    })
                })
                .unwrap_or_default();

            sizes.push(size);
        }

        if sizes.is_empty() {
            return Err(PdfPagesError::NoPages);
        }

        Ok(Self { sizes })
    }

    pub fn sizes(&self) -> &[PageSize] {
        &self.sizes
    }
}

impl PageSource for LopdfPages {
    fn page_count(&self) -> u32 {
        self.sizes.len() as u32
    }

    fn page_bounds(&self, page_index: u32) -> Result<PageSize, PdfPagesError> {
        self.sizes.get(page_index as usize).copied().ok_or(PdfPagesError::PageOutOfRange {
            page: page_index,
            page_count: self.sizes.len() as u32,
        })
    }
}
