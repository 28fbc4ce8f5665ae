use twinmouse::backends::virtual_input::VirtualSource;
use twinmouse::{
    Config, DeviceChange, Edge, HandCursor, Manager, MouseButton, MousePacket, PlayerSlot,
    WindowTarget,
};

fn main() {
    env_logger::init();

    let config = Config::default();
    let mut source = VirtualSource::new();
    let left = source.plug_mouse("Left Mouse");
    let right = source.plug_mouse("Right Mouse");

    let mut mgr = Manager::new(source, config.clone());
    mgr.initialize(WindowTarget(1)).expect("register raw input");
    mgr.handle_device_change(DeviceChange::Arrival(left));
    mgr.handle_device_change(DeviceChange::Arrival(right));

    // Inject a few notifications, as a message loop would between frames
    let src = mgr.source_mut();
    let events = [
        src.push(MousePacket::motion(left, 12, -3)),
        src.push(MousePacket::motion(left, 4, 1).with_edge(MouseButton::Left, Edge::Down)),
        src.push(MousePacket::motion(right, -20, 0).with_wheel(120)),
    ];
    for ev in events {
        mgr.decode(ev);
    }

    let mut hands = [
        HandCursor::new(320, 200, config.sensitivity),
        HandCursor::new(320, 200, config.sensitivity),
    ];
    for slot in PlayerSlot::ALL {
        if let Some(frame) = mgr.take_frame(slot) {
            let hand = &mut hands[slot.index()];
            hand.apply_frame(&frame);
            println!(
                "{slot}: {} at {:?} scroll={} grab={}",
                frame.device,
                hand.position(),
                frame.scroll,
                frame.pressed(MouseButton::Left)
            );
        }
    }

    println!("{:#?}", mgr.snapshot());
}
