//! Shared fixtures for unit and router tests.

use std::io::Cursor;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use docx_rs::{Docx, Paragraph, Run};
use serde_json::{json, Value};

use crate::config::Config;
use crate::evaluation::models::EvaluationResult;
use crate::llm_client::{GenerativeModel, LlmError};
use crate::state::AppState;

/// A well-formed, arithmetically consistent data science verdict (24 + 48 = 72).
pub fn sample_result_json() -> Value {
    json!({
        "overallScore": 72,
        "function": "data_science",
        "functionLabel": "Data Science",
        "experienceLevel": "experienced",
        "yearsOfExperience": 5,
        "parameters": [
            {
                "name": "Modern Tool Stack",
                "weight": 40,
                "score": 60,
                "weightedScore": 24,
                "positiveIndicators": ["Built RAG pipelines with LangChain"],
                "negativeIndicators": ["No evidence of vector databases in production"],
                "reasoning": "Uses LLM tooling in work projects but relies on classic ML elsewhere."
            },
            {
                "name": "Deployment & Application",
                "weight": 60,
                "score": 80,
                "weightedScore": 48,
                "positiveIndicators": ["Deployed a FastAPI inference service on AWS"],
                "negativeIndicators": ["No monitoring or drift detection mentioned"],
                "reasoning": "Models shipped to production behind an API with measurable latency gains."
            }
        ],
        "validationNotes": ["Tool stack evidenced in work experience, not only skills list"],
        "riskPenaltyApplied": false,
        "riskPenaltyReason": null,
        "summary": "Practitioner with production ML deployments and emerging GenAI experience.",
        "recommendations": [
            "Add evaluation metrics for the RAG system",
            "Describe monitoring of deployed models"
        ]
    })
}

pub fn sample_result() -> EvaluationResult {
    serde_json::from_value(sample_result_json()).unwrap()
}

pub fn sample_cv() -> String {
    [
        "Jane Doe - Senior Data Scientist",
        "Acme Analytics, 2019 - present",
        "Built RAG pipelines with LangChain and OpenAI embeddings for support search.",
        "Deployed a FastAPI inference service on AWS, cutting scoring latency by 40%.",
        "Skills: Python, SQL, PyTorch, Docker",
    ]
    .join("\n")
}

/// A `GenerativeModel` that returns a canned reply and remembers the last prompt.
#[derive(Clone)]
pub struct StubModel {
    reply: Result<String, u16>,
    last_prompt: Arc<Mutex<Option<String>>>,
}

impl StubModel {
    pub fn replying(reply: String) -> Self {
        Self {
            reply: Ok(reply),
            last_prompt: Arc::default(),
        }
    }

    pub fn failing(status: u16) -> Self {
        Self {
            reply: Err(status),
            last_prompt: Arc::default(),
        }
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.last_prompt.lock().unwrap().clone()
    }
}

#[async_trait]
impl GenerativeModel for StubModel {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        *self.last_prompt.lock().unwrap() = Some(prompt.to_string());
        match &self.reply {
            Ok(text) => Ok(text.clone()),
            Err(status) => Err(LlmError::Api {
                status: *status,
                message: "stub failure".to_string(),
            }),
        }
    }

    fn model_id(&self) -> &str {
        "stub-model"
    }
}

pub fn state_with(model: StubModel, config: Config) -> AppState {
    AppState {
        model: Arc::new(model),
        config,
    }
}

/// Builds an in-memory .docx with one paragraph per line.
pub fn build_docx(lines: &[&str]) -> Vec<u8> {
    let docx = lines.iter().fold(Docx::new(), |doc, line| {
        doc.add_paragraph(Paragraph::new().add_run(Run::new().add_text(*line)))
    });
    let mut cursor = Cursor::new(Vec::new());
    docx.build().pack(&mut cursor).unwrap();
    cursor.into_inner()
}

/// A single-page PDF that draws `text` in Helvetica.
pub fn build_pdf(text: &str) -> Vec<u8> {
    pdf_document(text, "/MediaBox [0 0 612 792] ")
}

/// A PDF whose page has no `/MediaBox` anywhere in its tree. `pdf-extract`
/// panics on it instead of returning an error.
pub fn build_pdf_without_media_box(text: &str) -> Vec<u8> {
    pdf_document(text, "")
}

fn pdf_document(text: &str, media_box: &str) -> Vec<u8> {
    let content = format!("BT /F1 12 Tf 72 720 Td ({text}) Tj ET");
    let objects = [
        "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
        "<< /Type /Pages /Kids [3 0 R] /Count 1 >>".to_string(),
        format!(
            "<< /Type /Page /Parent 2 0 R {media_box}/Contents 4 0 R \
             /Resources << /Font << /F1 5 0 R >> >> >>"
        ),
        format!(
            "<< /Length {} >>\nstream\n{content}\nendstream",
            content.len()
        ),
        "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica >>".to_string(),
    ];

    let mut pdf = b"%PDF-1.4\n".to_vec();
    let mut offsets = Vec::with_capacity(objects.len());
    for (i, object) in objects.iter().enumerate() {
        offsets.push(pdf.len());
        pdf.extend_from_slice(format!("{} 0 obj\n{object}\nendobj\n", i + 1).as_bytes());
    }

    let xref_at = pdf.len();
    let mut xref = format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1);
    for offset in offsets {
        xref.push_str(&format!("{offset:010} 00000 n \n"));
    }
    xref.push_str(&format!(
        "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{xref_at}\n%%EOF\n",
        objects.len() + 1
    ));
    pdf.extend_from_slice(xref.as_bytes());
    pdf
}

pub struct FormPart<'a> {
    name: &'a str,
    file: Option<(&'a str, &'a str)>,
    data: &'a [u8],
}

impl<'a> FormPart<'a> {
    pub fn text(name: &'a str, value: &'a str) -> Self {
        Self {
            name,
            file: None,
            data: value.as_bytes(),
        }
    }

    pub fn file(name: &'a str, file_name: &'a str, content_type: &'a str, data: &'a [u8]) -> Self {
        Self {
            name,
            file: Some((file_name, content_type)),
            data,
        }
    }
}

/// Encodes parts as `multipart/form-data`, returning the content type header and body.
pub fn multipart_body(parts: &[FormPart<'_>]) -> (String, Vec<u8>) {
    const BOUNDARY: &str = "readiness-test-boundary";
    let mut body = Vec::new();

    for part in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match part.file {
            Some((file_name, content_type)) => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                        part.name, file_name, content_type
                    )
                    .as_bytes(),
                );
            }
            None => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", part.name)
                        .as_bytes(),
                );
            }
        }
        body.extend_from_slice(part.data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    (format!("multipart/form-data; boundary={BOUNDARY}"), body)
}
