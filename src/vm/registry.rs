//! Handler Registry: Registration, Lookup, and Conflict Detection
//!
//! The registry maps each control code to a [`Family`] and each
//! `(control_code[, meta_command])` key to exactly one handler. It is built
//! once; registering two handlers under the same key is an error at build
//! time and can never happen while an engine runs.

use super::handler::Handler;
use super::handlers;
use super::instruction::Family;
use std::collections::HashMap;
use std::fmt;
use std::sync::OnceLock;

/// Error produced while building a registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationError {
    /// A family is already registered for this control code.
    DuplicateFamily(u8),
    /// Another handler already claims this key.
    DuplicateHandler {
        control_code: u8,
        meta_command: Option<u8>,
        existing: &'static str,
        new: &'static str,
    },
    /// The handler's control code has no family yet.
    UnknownFamily(u8),
    /// The handler expects a different family than the one registered.
    FamilyMismatch {
        control_code: u8,
        mnemonic: &'static str,
    },
    /// Control codes are 4 bits, meta commands 3 bits.
    OutOfRange {
        control_code: u8,
        meta_command: Option<u8>,
    },
}

impl RegistrationError {
    /// Whether two registrations claimed the same key
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::DuplicateFamily(_) | Self::DuplicateHandler { .. })
    }
}

impl fmt::Display for RegistrationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateFamily(cc) => write!(f, "Family 0x{:X} already registered", cc),
            Self::DuplicateHandler { control_code, meta_command, existing, new } => match meta_command {
                Some(mc) => write!(
                    f,
                    "Handler '{}' conflicts with '{}' at 0x{:X}/{}",
                    new, existing, control_code, mc
                ),
                None => write!(f, "Handler '{}' conflicts with '{}' at 0x{:X}", new, existing, control_code),
            },
            Self::UnknownFamily(cc) => write!(f, "No family registered for control code 0x{:X}", cc),
            Self::FamilyMismatch { control_code, mnemonic } => {
                write!(f, "Handler '{}' does not match the family of 0x{:X}", mnemonic, control_code)
            }
            Self::OutOfRange { control_code, meta_command } => {
                write!(f, "Key 0x{:X}/{:?} is out of range", control_code, meta_command)
            }
        }
    }
}

impl std::error::Error for RegistrationError {}

type HandlerKey = (u8, Option<u8>);

/// The pixel_lang handler registry.
pub struct HandlerRegistry {
    /// Registered handlers, in registration order.
    handlers: Vec<Box<dyn Handler>>,
    /// Key → index into `handlers`.
    index: HashMap<HandlerKey, usize>,
    /// Control code → family.
    families: HashMap<u8, Family>,
}

static STANDARD: OnceLock<Result<HandlerRegistry, RegistrationError>> = OnceLock::new();

impl HandlerRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
            index: HashMap::new(),
            families: HashMap::new(),
        }
    }

    /// The process-wide registry holding the standard catalog.
    ///
    /// Built on first use; later calls return the same instance.
    pub fn standard() -> Result<&'static HandlerRegistry, RegistrationError> {
        STANDARD
            .get_or_init(Self::build_standard)
            .as_ref()
            .map_err(|e| e.clone())
    }

    /// Build a fresh registry with the standard catalog.
    pub fn build_standard() -> Result<Self, RegistrationError> {
        let mut registry = Self::new();
        for (control_code, family) in handlers::standard_families() {
            registry.register_family(control_code, family)?;
        }
        for handler in handlers::standard_handlers() {
            registry.register(handler)?;
        }
        Ok(registry)
    }

    /// Declare how a control code is decoded.
    ///
    /// # Errors
    /// `DuplicateFamily` if the control code already has a family.
    pub fn register_family(&mut self, control_code: u8, family: Family) -> Result<(), RegistrationError> {
        if control_code > 0xF {
            return Err(RegistrationError::OutOfRange { control_code, meta_command: None });
        }
        if self.families.contains_key(&control_code) {
            return Err(RegistrationError::DuplicateFamily(control_code));
        }
        self.families.insert(control_code, family);
        Ok(())
    }

    /// Register a handler under its key.
    ///
    /// # Errors
    /// `DuplicateHandler` if the key is taken, `UnknownFamily` or
    /// `FamilyMismatch` if the handler does not fit its control code's family.
    pub fn register(&mut self, handler: Box<dyn Handler>) -> Result<(), RegistrationError> {
        let control_code = handler.control_code();
        let meta_command = handler.meta_command();

        if control_code > 0xF || meta_command.is_some_and(|mc| mc > 0b111) {
            return Err(RegistrationError::OutOfRange { control_code, meta_command });
        }

        let family = *self
            .families
            .get(&control_code)
            .ok_or(RegistrationError::UnknownFamily(control_code))?;

        let fits = match family {
            Family::Plain => meta_command.is_none(),
            Family::Meta(_) => meta_command.is_some(),
        };
        if !fits || handler.family() != family {
            return Err(RegistrationError::FamilyMismatch {
                control_code,
                mnemonic: handler.mnemonic(),
            });
        }

        let key = (control_code, meta_command);
        if let Some(&idx) = self.index.get(&key) {
            return Err(RegistrationError::DuplicateHandler {
                control_code,
                meta_command,
                existing: self.handlers[idx].mnemonic(),
                new: handler.mnemonic(),
            });
        }

        self.index.insert(key, self.handlers.len());
        self.handlers.push(handler);
        Ok(())
    }

    /// Family registered for a control code.
    pub fn family(&self, control_code: u8) -> Option<Family> {
        self.families.get(&control_code).copied()
    }

    /// Handler registered under a key.
    pub fn handler(&self, control_code: u8, meta_command: Option<u8>) -> Option<&dyn Handler> {
        self.index
            .get(&(control_code, meta_command))
            .map(|&idx| self.handlers[idx].as_ref())
    }

    /// Handlers sorted by key, for reference output.
    pub fn handlers(&self) -> Vec<&dyn Handler> {
        let mut all: Vec<&dyn Handler> = self.handlers.iter().map(|h| h.as_ref()).collect();
        all.sort_by_key(|h| (h.control_code(), h.meta_command()));
        all
    }

    /// Registered control codes with their families, ascending.
    pub fn families(&self) -> Vec<(u8, Family)> {
        let mut all: Vec<(u8, Family)> = self.families.iter().map(|(&cc, &f)| (cc, f)).collect();
        all.sort_by_key(|&(cc, _)| cc);
        all
    }

    /// Total number of registered handlers.
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl Default for HandlerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HandlerRegistry({} families, {} handlers)", self.families.len(), self.handlers.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vm::handler::{StepContext, StepResult};
    use crate::vm::instruction::{DecodedArgs, MetaLayout};

    /// Minimal handler for exercising the registry.
    struct TestHandler {
        cc: u8,
        mc: Option<u8>,
        family: Family,
        name: &'static str,
    }

    impl Handler for TestHandler {
        fn control_code(&self) -> u8 { self.cc }
        fn meta_command(&self) -> Option<u8> { self.mc }
        fn family(&self) -> Family { self.family }
        fn glyph(&self) -> char { 't' }
        fn mnemonic(&self) -> &'static str { self.name }
        fn description(&self) -> &'static str { "Test handler" }
        fn run(&self, _ctx: &mut StepContext<'_>, _args: DecodedArgs) -> StepResult {
            StepResult::Continue
        }
    }

    fn plain(cc: u8, name: &'static str) -> Box<dyn Handler> {
        Box::new(TestHandler { cc, mc: None, family: Family::Plain, name })
    }

    fn meta(cc: u8, mc: u8, name: &'static str) -> Box<dyn Handler> {
        Box::new(TestHandler {
            cc,
            mc: Some(mc),
            family: Family::Meta(MetaLayout::Register),
            name,
        })
    }

    #[test]
    fn test_register_and_lookup() {
        let mut registry = HandlerRegistry::new();
        registry.register_family(0x2, Family::Plain).unwrap();
        registry.register_family(0x9, Family::Meta(MetaLayout::Register)).unwrap();
        registry.register(plain(0x2, "A")).unwrap();
        registry.register(meta(0x9, 3, "B")).unwrap();

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.handler(0x2, None).unwrap().mnemonic(), "A");
        assert_eq!(registry.handler(0x9, Some(3)).unwrap().mnemonic(), "B");
        assert!(registry.handler(0x9, Some(4)).is_none());
        assert_eq!(registry.family(0x9), Some(Family::Meta(MetaLayout::Register)));
        assert_eq!(registry.family(0x3), None);
    }

    #[test]
    fn test_reject_duplicate_handler() {
        let mut registry = HandlerRegistry::new();
        registry.register_family(0x9, Family::Meta(MetaLayout::Register)).unwrap();
        registry.register(meta(0x9, 1, "FIRST")).unwrap();
        let err = registry.register(meta(0x9, 1, "SECOND")).unwrap_err();
        assert!(err.is_conflict());
        assert_eq!(
            err,
            RegistrationError::DuplicateHandler {
                control_code: 0x9,
                meta_command: Some(1),
                existing: "FIRST",
                new: "SECOND",
            }
        );
        // The original stays in place
        assert_eq!(registry.handler(0x9, Some(1)).unwrap().mnemonic(), "FIRST");
    }

    #[test]
    fn test_reject_duplicate_family() {
        let mut registry = HandlerRegistry::new();
        registry.register_family(0x1, Family::Plain).unwrap();
        let err = registry.register_family(0x1, Family::Plain).unwrap_err();
        assert_eq!(err, RegistrationError::DuplicateFamily(0x1));
        assert!(err.is_conflict());
    }

    #[test]
    fn test_reject_family_mismatch() {
        let mut registry = HandlerRegistry::new();
        registry.register_family(0x2, Family::Plain).unwrap();
        registry.register_family(0x9, Family::Meta(MetaLayout::Generic)).unwrap();

        assert!(matches!(
            registry.register(meta(0x2, 0, "META_ON_PLAIN")),
            Err(RegistrationError::FamilyMismatch { .. })
        ));
        assert!(matches!(
            registry.register(plain(0x9, "PLAIN_ON_META")),
            Err(RegistrationError::FamilyMismatch { .. })
        ));
        // Register layout handler on a generic family
        assert!(matches!(
            registry.register(meta(0x9, 0, "WRONG_LAYOUT")),
            Err(RegistrationError::FamilyMismatch { .. })
        ));
    }

    #[test]
    fn test_reject_unknown_family_and_range() {
        let mut registry = HandlerRegistry::new();
        assert_eq!(
            registry.register(plain(0x2, "A")).unwrap_err(),
            RegistrationError::UnknownFamily(0x2)
        );
        assert!(matches!(
            registry.register_family(0x10, Family::Plain),
            Err(RegistrationError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_standard_registry_is_shared() {
        let a = HandlerRegistry::standard().unwrap();
        let b = HandlerRegistry::standard().unwrap();
        assert!(std::ptr::eq(a, b));
        assert!(!a.is_empty());
    }

    #[test]
    fn test_standard_keys_unique() {
        let registry = HandlerRegistry::build_standard().unwrap();
        let handlers = registry.handlers();
        for (i, h) in handlers.iter().enumerate() {
            for other in &handlers[i + 1..] {
                assert_ne!(
                    (h.control_code(), h.meta_command()),
                    (other.control_code(), other.meta_command()),
                    "Duplicate key for {}",
                    h.mnemonic()
                );
            }
        }
    }
}
