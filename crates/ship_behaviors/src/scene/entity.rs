//! Entity implementation

slotmap::new_key_type! {
    /// Generational entity identifier
    ///
    /// A despawned entity's key never resolves again, even if its slot is
    /// reused, so holding one is a weak reference.
    pub struct Entity;
}

impl Entity {
    /// Rebuild an entity from an engine-side 64-bit id
    pub fn from_raw(raw: u64) -> Self {
        slotmap::KeyData::from_ffi(raw).into()
    }

    /// Get the raw 64-bit id for handing back to the engine
    pub fn to_raw(self) -> u64 {
        slotmap::Key::data(&self).as_ffi()
    }
}
