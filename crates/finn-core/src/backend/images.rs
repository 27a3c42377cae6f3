/// URL of a product image served by the backend.
///
/// Broken or missing images are the viewer's problem; nothing here checks
/// that the file exists.
pub fn image_url(base_url: &str, name: &str) -> String {
    format!(
        "{}/images/{}.png",
        base_url.trim_end_matches('/'),
        urlencoding::encode(name)
    )
}
