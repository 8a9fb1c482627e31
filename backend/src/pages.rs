//! Server-rendered HTML for the four user-facing pages.

use shared::Prediction;

const STYLE: &str = "\
body{font-family:sans-serif;max-width:720px;margin:2rem auto;padding:0 1rem;color:#222}\
h1{font-size:1.4rem}\
img.preview{max-width:100%;border:1px solid #ccc;border-radius:4px}\
.confidence{color:#555}\
.classes a{display:inline-block;margin:0 .5rem .5rem 0;padding:.3rem .8rem;\
border:1px solid #888;border-radius:4px;text-decoration:none;color:#222}\
.error{color:#a00}\
form.upload{margin-top:1rem}";

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn layout(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
<title>{title}</title>\n<style>{STYLE}</style>\n</head>\n<body>\n{body}\n</body>\n</html>\n",
        title = escape(title),
    )
}

pub fn upload_page() -> String {
    layout(
        "Landscape classifier",
        "<h1>Classify a landscape image</h1>\
<form class=\"upload\" action=\"/predict\" method=\"post\" enctype=\"multipart/form-data\">\
<input type=\"file\" name=\"file\" accept=\"image/*\">\
<button type=\"submit\">Predict</button>\
</form>",
    )
}

pub fn result_page(prediction: &Prediction) -> String {
    let class_links: String = prediction
        .class_labels
        .iter()
        .map(|label| {
            format!(
                "<a href=\"/feedback?label={label}\">{label}</a>",
                label = escape(label)
            )
        })
        .collect();

    let body = format!(
        "<h1>Prediction: {label}</h1>\
<p class=\"confidence\">Confidence: {confidence:.1}%</p>\
<img class=\"preview\" src=\"{data_url}\" alt=\"uploaded image\">\
<p>Was this wrong? Tell us the right class:</p>\
<p class=\"classes\">{class_links}</p>\
<p><a href=\"/\">Classify another image</a></p>",
        label = escape(&prediction.label),
        confidence = prediction.confidence * 100.0,
        data_url = prediction.image_data_url,
    );
    layout("Prediction result", &body)
}

pub fn feedback_page() -> String {
    layout(
        "Feedback received",
        "<h1>Thanks for your feedback</h1>\
<p>Your correction has been passed along.</p>\
<p><a href=\"/\">Classify another image</a></p>",
    )
}

pub fn error_page(message: &str) -> String {
    let body = format!(
        "<h1>We could not process that image</h1>\
<p class=\"error\">{message}</p>\
<p><a href=\"/\">Try another image</a></p>",
        message = escape(message),
    );
    layout("Something went wrong", &body)
}
