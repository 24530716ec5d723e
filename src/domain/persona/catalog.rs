//! Persona catalog - the registry of known personas.
//!
//! The catalog is read-only configuration. The engine consults it to title
//! conversations, greet the user, and snapshot message authors; responders
//! consult it to resolve a persona key to a remote replica identifier.

use std::collections::BTreeMap;

use super::persona::{PersonaId, PersonaProfile};

/// (key, name, title, color, greeting, remote replica id)
type BuiltinRow = (
    &'static str,
    &'static str,
    &'static str,
    &'static str,
    &'static str,
    &'static str,
);

const BUILTIN_PERSONAS: [BuiltinRow; 10] = [
    (
        "einstein",
        "Albert Einstein",
        "Theoretical Physicist",
        "from-blue-600 to-indigo-600",
        "Good day! I'm delighted to discuss the mysteries of the universe with you. What aspect of physics or life would you like to explore together?",
        "ac79c118-1ecc-4d32-8233-b024c1222f83",
    ),
    (
        "curie",
        "Marie Curie",
        "Physicist & Chemist",
        "from-emerald-600 to-teal-600",
        "Hello! I'm Marie Curie. I'm excited to share my passion for scientific research and discovery. What would you like to learn about?",
        "9ee507a5-380e-4fbb-8032-c93dcfcbddc0",
    ),
    (
        "davinci",
        "Leonardo da Vinci",
        "Renaissance Polymath",
        "from-amber-600 to-orange-600",
        "Greetings! I am Leonardo. Art, science, invention - they are all connected in the grand tapestry of knowledge. What shall we create or discover today?",
        "14ca5f8c-ef13-4be2-adf6-16781238f608",
    ),
    (
        "feynman",
        "Richard Feynman",
        "Theoretical Physicist",
        "from-purple-600 to-violet-600",
        "Hey there! I'm Dick Feynman. I love making complex physics simple and fun. What's puzzling you today? Let's figure it out together!",
        "59a698c2-587c-4386-9516-3e58d9470d69",
    ),
    (
        "angelou",
        "Maya Angelou",
        "Poet & Activist",
        "from-rose-600 to-pink-600",
        "Hello, dear soul. I'm Maya Angelou. I believe in the power of words to heal, inspire, and transform. What story shall we explore together?",
        "c3007642-393f-4d0e-80f8-dd790f50f061",
    ),
    (
        "gandhi",
        "Mahatma Gandhi",
        "Independence Leader",
        "from-green-600 to-emerald-600",
        "Namaste. I am Gandhi. Through truth and non-violence, we can achieve the impossible. How may we walk the path of righteousness together?",
        "225667c5-1043-4143-9a19-068d17e3a526",
    ),
    (
        "hawking",
        "Stephen Hawking",
        "Theoretical Physicist",
        "from-slate-600 to-gray-600",
        "Hello. Despite my physical limitations, my mind is free to explore the cosmos. Let's journey through space and time together.",
        "1bf68dd5-5378-4d13-bdd9-2276c86f08f8",
    ),
    (
        "twain",
        "Mark Twain",
        "Author & Humorist",
        "from-orange-600 to-red-600",
        "Well howdy there! Mark Twain's the name, and I reckon we're in for some fine conversation. What's on your mind, friend?",
        "276e026a-7297-4899-b1d5-c46b0291d01b",
    ),
    (
        "socrates",
        "Socrates",
        "Classical Philosopher",
        "from-stone-600 to-amber-600",
        "Greetings, my friend. I know nothing except that I know nothing. Shall we examine life together through questions?",
        "1c8d2864-3a34-4239-8c62-201067d3e5bf",
    ),
    (
        "mandela",
        "Nelson Mandela",
        "Anti-Apartheid Leader",
        "from-yellow-600 to-orange-600",
        "Hello, my friend. Ubuntu - I am because we are. Let us speak of justice, forgiveness, and the power of unity.",
        "02f90514-da37-4137-9337-ae3a02105cfd",
    ),
];

/// Registry of persona profiles keyed by persona id.
#[derive(Debug, Clone, Default)]
pub struct PersonaCatalog {
    profiles: BTreeMap<PersonaId, PersonaProfile>,
}

impl PersonaCatalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates the catalog of built-in historical personas.
    pub fn builtin() -> Self {
        BUILTIN_PERSONAS
            .iter()
            .filter_map(|(key, name, title, color, greeting, remote_id)| {
                let id = PersonaId::new(*key).ok()?;
                Some(PersonaProfile {
                    image: format!("/images/characters/{}.jpg", key),
                    id,
                    name: name.to_string(),
                    title: title.to_string(),
                    color: color.to_string(),
                    greeting: greeting.to_string(),
                    remote_id: Some(remote_id.to_string()),
                })
            })
            .fold(Self::new(), Self::with_profile)
    }

    /// Adds or replaces a profile.
    pub fn with_profile(mut self, profile: PersonaProfile) -> Self {
        self.profiles.insert(profile.id.clone(), profile);
        self
    }

    /// Looks up a known persona.
    pub fn get(&self, id: &PersonaId) -> Option<&PersonaProfile> {
        self.profiles.get(id)
    }

    /// Returns the profile for `id`, or a fallback profile for unknown keys.
    pub fn resolve(&self, id: &PersonaId) -> PersonaProfile {
        self.get(id)
            .cloned()
            .unwrap_or_else(|| PersonaProfile::unknown(id.clone()))
    }

    /// Returns the display name for `id` (the key itself when unknown).
    pub fn display_name(&self, id: &PersonaId) -> String {
        self.get(id)
            .map(|p| p.name.clone())
            .unwrap_or_else(|| id.to_string())
    }

    /// Returns the remote replica identifier, if one is registered.
    pub fn remote_id(&self, id: &PersonaId) -> Option<&str> {
        self.get(id).and_then(|p| p.remote_id.as_deref())
    }

    /// Returns true if the persona is registered.
    pub fn contains(&self, id: &PersonaId) -> bool {
        self.profiles.contains_key(id)
    }

    /// Iterates over all registered profiles in key order.
    pub fn profiles(&self) -> impl Iterator<Item = &PersonaProfile> {
        self.profiles.values()
    }

    /// Number of registered personas.
    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    /// Returns true if no personas are registered.
    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pid(key: &str) -> PersonaId {
        PersonaId::new(key).unwrap()
    }

    #[test]
    fn builtin_catalog_has_ten_personas() {
        let catalog = PersonaCatalog::builtin();
        assert_eq!(catalog.len(), 10);
        assert!(catalog.contains(&pid("einstein")));
        assert!(catalog.contains(&pid("mandela")));
    }

    #[test]
    fn builtin_profiles_carry_display_metadata() {
        let catalog = PersonaCatalog::builtin();
        let curie = catalog.get(&pid("curie")).unwrap();
        assert_eq!(curie.name, "Marie Curie");
        assert_eq!(curie.title, "Physicist & Chemist");
        assert_eq!(curie.image, "/images/characters/curie.jpg");
        assert_eq!(curie.first_name(), "Marie");
    }

    #[test]
    fn resolve_unknown_persona_falls_back() {
        let catalog = PersonaCatalog::builtin();
        let profile = catalog.resolve(&pid("hypatia"));
        assert_eq!(profile.name, "hypatia");
        assert!(!catalog.contains(&pid("hypatia")));
    }

    #[test]
    fn remote_id_resolves_for_trained_personas() {
        let catalog = PersonaCatalog::builtin();
        assert_eq!(
            catalog.remote_id(&pid("einstein")),
            Some("ac79c118-1ecc-4d32-8233-b024c1222f83")
        );
        assert_eq!(catalog.remote_id(&pid("hypatia")), None);
    }

    #[test]
    fn with_profile_replaces_existing_entry() {
        let mut custom = PersonaProfile::unknown(pid("einstein"));
        custom.name = "Prof. Einstein".to_string();

        let catalog = PersonaCatalog::builtin().with_profile(custom);
        assert_eq!(catalog.display_name(&pid("einstein")), "Prof. Einstein");
        assert_eq!(catalog.len(), 10);
    }
}
