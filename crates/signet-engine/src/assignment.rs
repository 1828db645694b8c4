//! Field-assignment resolver
//!
//! Fields reference positional slots ("recipient_2"), not recipient ids,
//! so a layout can exist before any recipient does. Resolution is a pure
//! function of the field list and a recipient's 1-based signing order and
//! is computed on demand; nothing stores a resolved copy.

use signet_types::{Field, FieldSlot};

/// Whether a field slot resolves to the recipient at `order`.
///
/// Sender fields never resolve to any recipient.
pub fn slot_matches(slot: FieldSlot, order: u32) -> bool {
    match slot {
        FieldSlot::Sender => false,
        FieldSlot::Recipient => order == 1,
        FieldSlot::Recipient2 => order == 2,
        FieldSlot::Recipient3 => order == 3,
    }
}

/// The subset of `fields` visible and writable to the recipient at `order`.
pub fn fields_for_recipient(fields: &[Field], order: u32) -> Vec<&Field> {
    fields
        .iter()
        .filter(|field| slot_matches(field.assigned_to, order))
        .collect()
}

/// The required subset of the recipient's resolved fields.
pub fn required_fields_for_recipient(fields: &[Field], order: u32) -> Vec<&Field> {
    fields
        .iter()
        .filter(|field| field.required && slot_matches(field.assigned_to, order))
        .collect()
}
