//! Field insertion
//!
//! This module orchestrates drawing one field onto a page:
//! 1. Resolve the page (a missing page fails before anything is written)
//! 2. Compute the field box from the page size and rotation
//! 3. Fit the signature image or the text into the box
//! 4. Embed the font or image and append the drawing to the page

use crate::font::{FieldFonts, encode_win_ansi};
use crate::geometry::{fit_image, fit_text, text_lines};
use crate::options::InsertOptions;
use crate::page::{
    PageResources, append_content, existing_content_refs, find_page, page_geometry,
};
use crate::render;
use crate::signature::SignatureImage;
use crate::types::*;
use lopdf::Document;
use std::path::Path;

/// Insert a field into an already loaded document.
///
/// Returns where the field was drawn, in the page's visual coordinates.
pub fn insert_field_in_pdf(
    doc: &mut Document,
    field: &Field,
    fonts: &FieldFonts,
    options: &InsertOptions,
) -> Result<Placement> {
    let page_id = find_page(doc, field.page)?;
    let geometry = page_geometry(doc, page_id)?;
    let (page_width, page_height) = geometry.effective_dimensions();
    let field_rect = geometry.field_rect(field);

    log::debug!(
        "Page {}: {}x{} pt as displayed, rotated {}°, field box {:?}",
        field.page,
        page_width,
        page_height,
        geometry.rotation.degrees(),
        field_rect
    );

    let mut resources = PageResources::for_page(doc, page_id)?;

    let (existing, body, placement) = if let Some(data) = field.signature_image() {
        // Decode before touching the document
        let image = SignatureImage::from_base64(data)?;
        let placement = fit_image(
            image.width() as f32,
            image.height() as f32,
            &field_rect,
            page_height,
        );

        let existing = existing_content_refs(doc, page_id)?;
        let image_id = image.embed(doc)?;
        let name = resources.add_xobject(image_id);
        (
            existing,
            render::image_operations(&name, &placement),
            Placement::Image(placement),
        )
    } else {
        let font = fonts.for_field(field.field_type);
        let placement = fit_text(
            font,
            &field.custom_text,
            &field_rect,
            page_height,
            options.font_sizes(field.field_type),
        );

        if field.custom_text.is_empty() {
            log::debug!("Field on page {} has no text, nothing drawn", field.page);
            return Ok(Placement::Text(placement));
        }

        let lines: Vec<Vec<u8>> = text_lines(&field.custom_text)
            .map(|line| {
                let (bytes, replaced) = encode_win_ansi(line);
                if replaced > 0 {
                    log::warn!(
                        "{} character(s) not representable in {}, replaced with '?'",
                        replaced,
                        font.name()
                    );
                }
                bytes
            })
            .collect();

        let existing = existing_content_refs(doc, page_id)?;
        let font_id = font.embed(doc)?;
        let name = resources.add_font(font_id);
        (
            existing,
            render::text_operations(&name, &placement, &lines),
            Placement::Text(placement),
        )
    };

    let content = render::in_visual_space(&geometry.visual_to_user(), &body);
    append_content(
        doc,
        page_id,
        existing,
        resources.into_dictionary(),
        content.into_bytes(),
    )?;

    log::info!("Inserted {:?} field on page {}", field.field_type, field.page);
    Ok(placement)
}

/// Insert a field, loading the fonts named by `options`
pub async fn insert_field(
    doc: Document,
    field: &Field,
    options: &InsertOptions,
) -> Result<(Document, Placement)> {
    options.validate()?;

    let fonts = FieldFonts::load(options).await?;
    let field = field.clone();
    let options = options.clone();

    tokio::task::spawn_blocking(move || {
        let mut doc = doc;
        let placement = insert_field_in_pdf(&mut doc, &field, &fonts, &options)?;
        Ok::<_, FieldError>((doc, placement))
    })
    .await?
}

/// Load a PDF from memory, insert a field and serialize it again
pub async fn insert_field_in_pdf_bytes(
    bytes: Vec<u8>,
    field: &Field,
    options: &InsertOptions,
) -> Result<Vec<u8>> {
    let doc = tokio::task::spawn_blocking(move || Document::load_mem(&bytes)).await??;
    let (doc, _) = insert_field(doc, field, options).await?;
    save_to_bytes(doc).await
}

/// Load a PDF document
pub async fn load_pdf(path: impl AsRef<Path>) -> Result<Document> {
    let path = path.as_ref().to_owned();
    let bytes = tokio::fs::read(&path).await?;
    let doc = tokio::task::spawn_blocking(move || Document::load_mem(&bytes)).await??;
    Ok(doc)
}

/// Save a document
pub async fn save_pdf(doc: Document, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref().to_owned();
    let bytes = save_to_bytes(doc).await?;
    tokio::fs::write(&path, bytes).await?;
    Ok(())
}

async fn save_to_bytes(mut doc: Document) -> Result<Vec<u8>> {
    let bytes = tokio::task::spawn_blocking(move || {
        let mut writer = Vec::new();
        doc.save_to(&mut writer)?;
        Ok::<_, FieldError>(writer)
    })
    .await??;
    Ok(bytes)
}
