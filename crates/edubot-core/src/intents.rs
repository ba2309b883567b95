use crate::types::Resolution;

pub const FALLBACK_INTENT: &str = "fallback";
pub const FALLBACK_REPLY: &str =
    "Lo siento, no entendí. Prueba: horario, matrícula, constancia, calendario, ruta.";

pub struct IntentDef {
    pub intent: &'static str,
    pub keywords: &'static [&'static str],
    pub reply: &'static str,
}

/// Fixed priority order: earlier definitions win ties.
pub const INTENTS: &[IntentDef] = &[
    IntentDef {
        intent: "horario",
        keywords: &["horario", "hora", "clase"],
        reply: "El horario escolar es L-V 7:00 - 12:00.",
    },
    IntentDef {
        intent: "matricula",
        keywords: &["matrícula", "matricula", "inscripción"],
        reply: "Para matricularte necesitas documento de identidad y el formulario de inscripción.",
    },
    IntentDef {
        intent: "constancia",
        keywords: &["constancia", "certificado"],
        reply: "Puedes solicitar la constancia a través del gestor de trámites en la sección 'Trámites'.",
    },
    IntentDef {
        intent: "calendario",
        keywords: &["calendario", "fechas", "vacaciones"],
        reply: "El calendario académico 2025 inicia el 10 de febrero.",
    },
    IntentDef {
        intent: "ruta",
        keywords: &["ruta", "bus", "ruta escolar"],
        reply: "Las rutas escolares se publican en la secretaría. ¿Quieres el enlace?",
    },
];

pub fn resolve(text: &str) -> Resolution {
    let lowered = text.to_lowercase();
    for def in INTENTS {
        for keyword in def.keywords {
            if lowered.contains(keyword) {
                return Resolution {
                    intent: def.intent.to_string(),
                    reply: def.reply.to_string(),
                };
            }
        }
    }
    Resolution {
        intent: FALLBACK_INTENT.to_string(),
        reply: FALLBACK_REPLY.to_string(),
    }
}
