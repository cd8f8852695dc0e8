//! Entity snapshots as the host pushes them, plus the typed attribute
//! accessors widgets read them through.
//!
//! The host owns the real entity store; what arrives here is a bounded
//! snapshot of the handful of entities one panel displays. Attribute access
//! goes through [`NumAttr`]/[`TextAttr`] descriptors so each widget declares
//! its "missing attribute means X" policy exactly once.

use heapless::{String, Vec};
use log::debug;

pub const ENTITY_ID_MAX: usize = 48;
pub const ENTITY_STATE_MAX: usize = 24;
pub const ATTR_KEY_MAX: usize = 24;
pub const ATTR_TEXT_MAX: usize = 32;
pub const ENTITY_ATTRS_MAX: usize = 16;
pub const SNAPSHOT_ENTITIES_MAX: usize = 8;

#[derive(Clone, Debug, PartialEq)]
pub enum AttrValue {
    Int(i32),
    Num(f32),
    Bool(bool),
    Text(String<ATTR_TEXT_MAX>),
}

impl AttrValue {
    pub fn text(value: &str) -> Self {
        Self::Text(bounded(value))
    }

    pub fn as_num(&self) -> Option<f32> {
        match self {
            Self::Num(value) => Some(*value),
            Self::Int(value) => Some(*value as f32),
            _ => None,
        }
    }
}

/// State string plus attribute map for one entity.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EntityState {
    state: String<ENTITY_STATE_MAX>,
    attributes: Vec<(String<ATTR_KEY_MAX>, AttrValue), ENTITY_ATTRS_MAX>,
}

impl EntityState {
    pub fn new(state: &str) -> Self {
        Self {
            state: bounded(state),
            attributes: Vec::new(),
        }
    }

    pub fn state(&self) -> &str {
        &self.state
    }

    pub fn with_attr(mut self, key: &str, value: AttrValue) -> Self {
        self.set_attr(key, value);
        self
    }

    pub fn set_attr(&mut self, key: &str, value: AttrValue) {
        if let Some((_, existing)) = self
            .attributes
            .iter_mut()
            .find(|(name, _)| name.as_str() == key)
        {
            *existing = value;
            return;
        }
        if self.attributes.push((bounded(key), value)).is_err() {
            debug!("entity attribute map full, '{key}' dropped");
        }
    }

    pub fn attr(&self, key: &str) -> Option<&AttrValue> {
        self.attributes
            .iter()
            .find(|(name, _)| name.as_str() == key)
            .map(|(_, value)| value)
    }

    pub fn num(&self, key: &str) -> Option<f32> {
        self.attr(key).and_then(AttrValue::as_num)
    }

    pub fn flag(&self, key: &str) -> Option<bool> {
        match self.attr(key)? {
            AttrValue::Bool(value) => Some(*value),
            _ => None,
        }
    }

    pub fn text(&self, key: &str) -> Option<&str> {
        match self.attr(key)? {
            AttrValue::Text(value) => Some(value.as_str()),
            _ => None,
        }
    }
}

/// One row of a widget's numeric default policy table.
#[derive(Clone, Copy, Debug)]
pub struct NumAttr {
    pub key: &'static str,
    pub fallback: f32,
}

impl NumAttr {
    pub const fn new(key: &'static str, fallback: f32) -> Self {
        Self { key, fallback }
    }

    pub fn read(&self, entity: &EntityState) -> f32 {
        entity.num(self.key).unwrap_or(self.fallback)
    }

    pub fn read_opt(&self, entity: &EntityState) -> Option<f32> {
        entity.num(self.key)
    }
}

/// One row of a widget's textual default policy table.
#[derive(Clone, Copy, Debug)]
pub struct TextAttr {
    pub key: &'static str,
    pub fallback: &'static str,
}

impl TextAttr {
    pub const fn new(key: &'static str, fallback: &'static str) -> Self {
        Self { key, fallback }
    }

    pub fn read<'a>(&self, entity: &'a EntityState) -> &'a str {
        entity.text(self.key).unwrap_or(self.fallback)
    }
}

/// The named entities one host push carries. Each push replaces an entity's
/// previous state wholesale.
#[derive(Clone, Debug, Default)]
pub struct EntitySnapshot {
    entries: Vec<(String<ENTITY_ID_MAX>, EntityState), SNAPSHOT_ENTITIES_MAX>,
}

impl EntitySnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, entity_id: &str, state: EntityState) {
        if let Some((_, existing)) = self
            .entries
            .iter_mut()
            .find(|(id, _)| id.as_str() == entity_id)
        {
            *existing = state;
            return;
        }
        if self.entries.push((bounded(entity_id), state)).is_err() {
            debug!("entity snapshot full, '{entity_id}' dropped");
        }
    }

    pub fn get(&self, entity_id: &str) -> Option<&EntityState> {
        self.entries
            .iter()
            .find(|(id, _)| id.as_str() == entity_id)
            .map(|(_, state)| state)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Copy as many leading chars as fit; hosts with longer identifiers than
/// the panel supports lose the tail rather than the whole value.
fn bounded<const N: usize>(text: &str) -> String<N> {
    let mut out = String::new();
    for ch in text.chars() {
        if out.push(ch).is_err() {
            break;
        }
    }
    out
}
