//! Leitura de currículos: extração de texto, skills e pontuação ATS.

pub mod ats;
pub mod extractor;
pub mod parser;

pub use ats::{ats_score, AtsScore, SectionPresence};
pub use extractor::{extract_text, DocumentFormat};
pub use parser::{extract_skills, ExtractedSkill, ExtractionSource};
