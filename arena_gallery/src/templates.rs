use tera::Tera;

/// Escapes `& < > " '` only, so URLs in attributes stay readable.
fn escape_attribute_safe(input: &str) -> String {
    html_escape::encode_quoted_attribute(input).into_owned()
}

/// Builds the template set from the files compiled into the binary.
pub fn build_tera() -> Result<Tera, tera::Error> {
    let mut tera = Tera::default();
    tera.add_raw_template("gallery.html", include_str!("../templates/gallery.html"))?;
    tera.set_escape_fn(escape_attribute_safe);
    Ok(tera)
}
