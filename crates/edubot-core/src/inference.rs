use crate::error::InferenceError;
use crate::types::Resolution;
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

const OUTPUT_LIMIT: usize = 64 * 1024;

pub const UNKNOWN_INTENT: &str = "desconocido";
pub const DIRECT_INTENT: &str = "direct_answer";
pub const REFORMULATE_REPLY: &str =
    "No estoy seguro de haber entendido. ¿Puedes reformular tu pregunta?";

pub const INTENT_VOCABULARY: &[&str] = &[
    "horario",
    "matricula",
    "constancia",
    "calendario",
    "ruta",
    UNKNOWN_INTENT,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelMode {
    /// The model is instructed to answer with strict `{"intent", "reply"}` JSON.
    Json,
    /// The trimmed raw output is returned verbatim under a fixed intent.
    Direct,
}

#[derive(Debug, Clone)]
pub struct InferenceConfig {
    /// Full command line of the generation tool, e.g. `"ollama run edubot-es"`.
    /// The constructed prompt is appended as the final argument.
    pub command: String,
    pub mode: ModelMode,
    pub timeout: Duration,
    pub num_predict: Option<u32>,
}

impl InferenceConfig {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            mode: ModelMode::Json,
            timeout: Duration::from_secs(40),
            num_predict: None,
        }
    }

    pub fn resolve(&self, text: &str) -> Result<Resolution, InferenceError> {
        let prompt = match self.mode {
            ModelMode::Json => json_prompt(text),
            ModelMode::Direct => direct_prompt(text),
        };
        let raw = self.run_model(&prompt)?;
        match self.mode {
            ModelMode::Json => Ok(parse_resolution(&raw).unwrap_or(Resolution {
                intent: UNKNOWN_INTENT.to_string(),
                reply: REFORMULATE_REPLY.to_string(),
            })),
            ModelMode::Direct => {
                let reply = raw.trim();
                if reply.is_empty() {
                    return Err(InferenceError::Internal {
                        message: "model produced no output".to_string(),
                    });
                }
                Ok(Resolution {
                    intent: DIRECT_INTENT.to_string(),
                    reply: reply.to_string(),
                })
            }
        }
    }

    fn run_model(&self, prompt: &str) -> Result<String, InferenceError> {
        let argv =
            shell_words::split(&self.command).map_err(|err| InferenceError::Unavailable {
                message: err.to_string(),
            })?;
        let (program, args) = argv.split_first().ok_or_else(|| InferenceError::Unavailable {
            message: "model command empty".to_string(),
        })?;

        let mut command = Command::new(program);
        command
            .args(args)
            .arg(prompt)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(num_predict) = self.num_predict {
            command.env("OLLAMA_NUM_PREDICT", num_predict.to_string());
        }

        let mut child = command.spawn().map_err(|err| InferenceError::Unavailable {
            message: err.to_string(),
        })?;

        // The pipes must be drained while the child runs, or output past the
        // pipe buffer blocks it until the deadline.
        let stdout = spawn_drain(child.stdout.take());
        let stderr = spawn_drain(child.stderr.take());

        let deadline = Instant::now() + self.timeout;
        let status = loop {
            if let Some(status) = child.try_wait().map_err(|err| InferenceError::Internal {
                message: err.to_string(),
            })? {
                break status;
            }
            if Instant::now() >= deadline {
                let _ = child.kill();
                let _ = child.wait();
                return Err(InferenceError::Timeout);
            }
            std::thread::sleep(Duration::from_millis(50));
        };

        let stdout = stdout.join().unwrap_or_default();
        let stderr = stderr.join().unwrap_or_default();
        if !status.success() {
            return Err(InferenceError::Internal {
                message: stderr.trim().to_string(),
            });
        }
        Ok(stdout)
    }
}

fn spawn_drain<R: std::io::Read + Send + 'static>(
    pipe: Option<R>,
) -> std::thread::JoinHandle<String> {
    std::thread::spawn(move || {
        let Some(mut pipe) = pipe else {
            return String::new();
        };
        let mut captured = Vec::new();
        let mut chunk = [0u8; 8192];
        loop {
            match pipe.read(&mut chunk) {
                Ok(0) | Err(_) => break,
                Ok(read) => {
                    // Keep reading past the cap so the child never blocks.
                    if captured.len() < OUTPUT_LIMIT {
                        let take = read.min(OUTPUT_LIMIT - captured.len());
                        captured.extend_from_slice(&chunk[..take]);
                    }
                }
            }
        }
        String::from_utf8_lossy(&captured).into_owned()
    })
}

fn json_prompt(text: &str) -> String {
    format!(
        "Eres el asistente virtual de una escuela. Clasifica el mensaje del usuario y respóndelo.\n\
         Contesta ÚNICAMENTE con un JSON válido con los campos \"intent\" y \"reply\".\n\
         \"intent\" debe ser uno de: {}.\n\
         Mensaje del usuario: {text}",
        INTENT_VOCABULARY.join(", ")
    )
}

fn direct_prompt(text: &str) -> String {
    format!(
        "Eres el asistente virtual de una escuela. Responde en español, de forma breve y amable.\n\
         Mensaje del usuario: {text}"
    )
}

/// Tolerant parse of model output: strict JSON first, then a recovery pass
/// over the largest balanced `{...}` span (the model may wrap the JSON in
/// commentary).
pub fn parse_resolution(raw: &str) -> Option<Resolution> {
    if let Ok(resolution) = serde_json::from_str::<Resolution>(raw.trim()) {
        return Some(resolution);
    }
    let span = extract_balanced_object(raw)?;
    serde_json::from_str(span).ok()
}

/// Returns the largest balanced `{...}` span in `raw`, tracking string
/// literals so braces inside quoted values do not break the count.
pub fn extract_balanced_object(raw: &str) -> Option<&str> {
    let bytes = raw.as_bytes();
    let mut best: Option<(usize, usize)> = None;
    let mut start = None;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (index, byte) in bytes.iter().enumerate() {
        if in_string {
            if escaped {
                escaped = false;
            } else if *byte == b'\\' {
                escaped = true;
            } else if *byte == b'"' {
                in_string = false;
            }
            continue;
        }
        match byte {
            b'"' if depth > 0 => in_string = true,
            b'{' => {
                if depth == 0 {
                    start = Some(index);
                }
                depth += 1;
            }
            b'}' if depth > 0 => {
                depth -= 1;
                if depth == 0 {
                    let open = start.take()?;
                    let len = index + 1 - open;
                    if best.is_none_or(|(_, best_len)| len > best_len) {
                        best = Some((open, len));
                    }
                }
            }
            _ => {}
        }
    }

    best.map(|(open, len)| &raw[open..open + len])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strict_json_parses() {
        let raw = r#"{"intent": "horario", "reply": "L-V 7:00 - 12:00"}"#;
        let resolution = parse_resolution(raw).unwrap();
        assert_eq!(resolution.intent, "horario");
        assert_eq!(resolution.reply, "L-V 7:00 - 12:00");
    }

    #[test]
    fn json_embedded_in_commentary_is_recovered() {
        let raw = "Claro, aquí tienes la respuesta:\n{\"intent\": \"ruta\", \"reply\": \"Las rutas se publican en secretaría.\"}\nEspero que ayude.";
        let resolution = parse_resolution(raw).unwrap();
        assert_eq!(resolution.intent, "ruta");
    }

    #[test]
    fn braces_inside_strings_do_not_break_the_scan() {
        let raw = r#"nota {"intent": "calendario", "reply": "usa {fecha} como marcador"} fin"#;
        let resolution = parse_resolution(raw).unwrap();
        assert_eq!(resolution.reply, "usa {fecha} como marcador");
    }

    #[test]
    fn largest_balanced_span_wins() {
        let raw = r#"{"x": 1} y {"intent": "horario", "reply": "las clases inician a las 7"}"#;
        let span = extract_balanced_object(raw).unwrap();
        assert!(span.contains("horario"));
    }

    #[test]
    fn unbalanced_output_yields_nothing() {
        assert!(extract_balanced_object("{\"intent\": \"horario\"").is_none());
        assert!(parse_resolution("sin json por ninguna parte").is_none());
    }

    #[test]
    fn missing_tool_is_unavailable() {
        let config = InferenceConfig::new("edubot-no-such-model-tool");
        let err = config.resolve("hola").unwrap_err();
        assert!(matches!(err, InferenceError::Unavailable { .. }));
    }

    #[test]
    fn slow_tool_times_out() {
        let mut config = InferenceConfig::new("sleep 30");
        config.timeout = Duration::from_millis(200);
        let err = config.resolve("hola").unwrap_err();
        assert!(matches!(err, InferenceError::Timeout));
    }

    #[test]
    fn output_larger_than_the_pipe_buffer_completes_before_the_deadline() {
        let mut config =
            InferenceConfig::new("awk 'BEGIN { for (i = 0; i < 100000; i++) print \"x\" }'");
        config.timeout = Duration::from_secs(5);
        // awk with only a BEGIN block exits without reading the prompt file.
        let resolution = config.resolve("hola").unwrap();
        assert_eq!(resolution.intent, UNKNOWN_INTENT);
    }

    #[test]
    fn direct_mode_returns_trimmed_output_verbatim() {
        let mut config = InferenceConfig::new("echo Hola, las clases inician en febrero.");
        config.mode = ModelMode::Direct;
        // echo appends the prompt as its final argument; the reply is the
        // whole echoed line, which is fine for the verbatim contract.
        let resolution = config.resolve("hola").unwrap();
        assert_eq!(resolution.intent, DIRECT_INTENT);
        assert!(resolution.reply.starts_with("Hola, las clases inician"));
    }
}
