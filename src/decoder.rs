//! Folding decoded notifications into device records.
//!
//! Policy is **accumulate-until-consumed**: motion and wheel steps are added
//! to whatever the record already holds and are only zeroed by the consumer
//! (`consume_motion` / `consume_scroll`). The platform coalesces motion
//! faster than a game ticks, so nothing between two reads may be dropped.
//!
//! Buttons only change when the packet mentions them.

use crate::device::{DeviceRecord, MouseButton};
use crate::event::MousePacket;
use crate::state::DeviceStateTable;
use log::trace;

/// Apply `packet` to its device's record.
///
/// Returns a copy of the updated record, or `None` (nothing written) when the
/// originating device is not registered.
pub fn fold_packet(table: &mut DeviceStateTable, packet: &MousePacket) -> Option<DeviceRecord> {
    let Some(rec) = table.get_mut(packet.device) else {
        trace!("drop packet from unregistered {}", packet.device);
        return None;
    };

    rec.motion_delta.0 = rec.motion_delta.0.saturating_add(packet.dx);
    rec.motion_delta.1 = rec.motion_delta.1.saturating_add(packet.dy);
    rec.scroll_delta = rec.scroll_delta.saturating_add(packet.wheel_step());

    for button in MouseButton::ALL {
        if let Some(edges) = packet.edges[button.index()] {
            for edge in edges.edges() {
                rec.buttons.apply(button, *edge);
            }
        }
    }

    Some(rec.clone())
}
