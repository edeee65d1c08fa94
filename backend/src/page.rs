use shared::DetectionResult;

pub const UPLOADS_URL: &str = "/static/uploads";
pub const RESULTS_URL: &str = "/static/results";

/// Everything the upload page shows. An empty page has no result fields set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndexPage {
    pub original_image: Option<String>,
    pub result_images: Vec<String>,
    pub has_tumor: Option<bool>,
    pub confidence: Option<String>,
}

impl IndexPage {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_result(
        original_image: impl Into<String>,
        result_images: Vec<String>,
        detection: &DetectionResult,
    ) -> Self {
        Self {
            original_image: Some(original_image.into()),
            result_images,
            has_tumor: Some(detection.has_tumor),
            confidence: Some(detection.confidence_label()),
        }
    }

    pub fn render(&self) -> String {
        let mut body = String::new();
        body.push_str(UPLOAD_FORM);

        if let (Some(original), Some(has_tumor), Some(confidence)) =
            (&self.original_image, self.has_tumor, &self.confidence)
        {
            let (verdict_class, verdict) = if has_tumor {
                ("verdict positive", "Tumor detected")
            } else {
                ("verdict negative", "No tumor detected")
            };

            body.push_str("<section class=\"results\">\n");
            body.push_str(&format!(
                "<p class=\"{}\">{}</p>\n<p class=\"confidence\">Confidence: {}</p>\n",
                verdict_class,
                verdict,
                escape_html(confidence)
            ));
            body.push_str(&format!(
                "<figure><img src=\"{}\" alt=\"Original scan\"><figcaption>{}</figcaption></figure>\n",
                asset_url(UPLOADS_URL, original),
                escape_html(original)
            ));
            for image in &self.result_images {
                body.push_str(&format!(
                    "<figure><img src=\"{}\" alt=\"{}\"></figure>\n",
                    asset_url(RESULTS_URL, image),
                    escape_html(image)
                ));
            }
            body.push_str("</section>\n");
        }

        layout("Tumor Detection", &body)
    }
}

pub fn render_error(message: &str) -> String {
    layout(
        "Processing failed",
        &format!(
            "<p class=\"error\">The scan could not be processed: {}</p>\n<p><a href=\"/\">Try again</a></p>\n",
            escape_html(message)
        ),
    )
}

const UPLOAD_FORM: &str = "<form method=\"post\" action=\"/\" enctype=\"multipart/form-data\">\n\
<input type=\"file\" name=\"file\" accept=\".png,.jpg,.jpeg,.dcm\">\n\
<button type=\"submit\">Analyze</button>\n\
</form>\n";

fn layout(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n</head>\n<body>\n<h1>{}</h1>\n{}</body>\n</html>\n",
        escape_html(title),
        escape_html(title),
        body
    )
}

fn asset_url(prefix: &str, name: &str) -> String {
    format!("{}/{}", prefix, urlencoding::encode(name))
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
