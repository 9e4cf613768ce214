pub mod ner;
pub mod structural;

use crate::types::Recognizer;

/// Build the fixed recognizer registry: structural regex recognizers plus
/// the PERSON/LOCATION entity backend. `LEGAL_ROLE_NAME` is not a member of
/// this registry — it is a post-processing promotion applied to `PERSON`
/// results in [`crate::detector`], since it depends on another
/// recognizer's output rather than scanning the text independently.
pub fn build_registry() -> Vec<Box<dyn Recognizer>> {
    let mut registry = structural::build();
    registry.push(Box::new(ner::PersonRecognizer));
    registry.push(Box::new(ner::LocationRecognizer));
    registry
}
