//! Simulated Persona Responder - canned in-character replies.
//!
//! Used when no remote persona service is configured, or when a persona has
//! no remote replica. Each supported persona has a small set of lines; one is
//! picked at random per call. Unknown personas borrow Einstein's lines.
//!
//! Seed the generator with [`SimulatedPersonaResponder::with_seed`] for
//! reproducible demos and tests.

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::sync::{Mutex, PoisonError};

use crate::domain::foundation::Timestamp;
use crate::ports::{ChatRequest, PersonaReply, PersonaResponder, ResponderError};

const FALLBACK_PERSONA: &str = "einstein";

static CANNED_LINES: [(&str, [&str; 4]); 5] = [
    (
        "einstein",
        [
            "That's a fascinating question! From my perspective, this relates to the fundamental nature of space and time. You see, when we consider the implications of relativity...",
            "Ah, this reminds me of my thought experiments with light and gravity. The beauty of physics lies in its elegant simplicity, much like E=mc²...",
            "Your curiosity reminds me of my younger self. As I once said, 'Imagination is more important than knowledge.' Let's explore this concept together...",
            "This problem requires us to think beyond conventional wisdom. In my work on the photoelectric effect, I discovered that sometimes the most revolutionary ideas...",
        ],
    ),
    (
        "curie",
        [
            "In my laboratory work, I observed similar phenomena when studying radioactive elements. The dedication to scientific truth must guide our exploration...",
            "This requires careful, methodical investigation - much like my research with radium and polonium. Persistence and curiosity will lead us to the answer...",
            "As the first woman to win a Nobel Prize, I learned that breaking barriers requires both courage and rigorous scientific method. Let me share what I've discovered...",
            "The glow of radium in my laboratory taught me that nature holds many secrets. Your question touches on something I've pondered deeply...",
        ],
    ),
    (
        "davinci",
        [
            "Salve! This question connects art, science, and invention - they are all part of the grand tapestry of knowledge. In my notebooks, I've sketched similar concepts...",
            "Ah, this reminds me of my studies of water flow and bird flight. Nature is the greatest teacher, and observation is our most powerful tool...",
            "From my anatomical studies to my flying machine designs, I've learned that understanding requires both artistic vision and scientific rigor...",
            "This puzzle delights me! It's like designing a new machine - we must understand each component and how they work together...",
        ],
    ),
    (
        "feynman",
        [
            "Hey, that's a great question! Let me break this down in a simple way. You know, the beauty of physics is that complex things often have simple explanations...",
            "This is exactly the kind of puzzle I love to solve! The key is to think about it from first principles - what do we really know for sure?",
            "You know what? This reminds me of a problem I worked on at Los Alamos. The trick is to not get intimidated by complexity...",
            "I love your curiosity! As I always say, if you can't explain it simply, you don't understand it well enough. Let's figure this out together...",
        ],
    ),
    (
        "angelou",
        [
            "Hello, dear soul. Your question touches something deep within me. In my experience, the most profound truths often come from the simplest observations...",
            "This reminds me of something I wrote in 'I Know Why the Caged Bird Sings.' Life teaches us that wisdom comes from both joy and struggle...",
            "Words have power, and your question carries the weight of genuine curiosity. Let me share what my journey has taught me about this...",
            "As I've learned through my years as a poet and activist, the most important conversations are those that challenge us to grow...",
        ],
    ),
];

/// Returns the canned lines for a persona key, or the fallback set.
pub fn canned_lines(persona: &str) -> &'static [&'static str] {
    CANNED_LINES
        .iter()
        .find(|(key, _)| *key == persona)
        .or_else(|| CANNED_LINES.iter().find(|(key, _)| *key == FALLBACK_PERSONA))
        .map(|(_, lines)| &lines[..])
        .unwrap_or(&[])
}

/// Local responder that answers with canned lines.
#[derive(Debug)]
pub struct SimulatedPersonaResponder {
    rng: Mutex<StdRng>,
}

impl Default for SimulatedPersonaResponder {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulatedPersonaResponder {
    /// Creates a responder seeded from system entropy.
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Creates a responder whose choices are reproducible.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    fn pick(&self, persona: &str) -> Option<&'static str> {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        canned_lines(persona).choose(&mut *rng).copied()
    }
}

#[async_trait]
impl PersonaResponder for SimulatedPersonaResponder {
    async fn chat(&self, request: ChatRequest) -> Result<PersonaReply, ResponderError> {
        let persona = request.persona_id.as_str();
        let content = self
            .pick(persona)
            .ok_or_else(|| ResponderError::Unavailable("no simulated lines available".to_string()))?;

        let now = Timestamp::now();
        Ok(PersonaReply {
            id: format!("{}-{}", now.as_datetime().timestamp_millis(), persona),
            content: content.to_string(),
            timestamp: now,
        })
    }
}
