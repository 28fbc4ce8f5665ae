//! Lists every raw input device and whether the registry would accept it.

#[cfg(target_os = "windows")]
fn main() {
    use twinmouse::backends::windows::WindowsRawInput;
    use twinmouse::registry::validate;
    use twinmouse::{Config, RawInputSource};

    env_logger::init();
    let config = Config::default();
    let source = WindowsRawInput::new();
    let ids = source.connected_devices().expect("list raw input devices");
    for id in ids {
        match source.device_info(id) {
            Some(info) => {
                let verdict = validate(&info, &config.remote_session_marker);
                println!(
                    "{id} {:?} accepted={} {}",
                    info.class,
                    verdict.is_ok(),
                    serde_json::to_string(&info.meta).unwrap_or_default()
                );
            }
            None => println!("{id} <no info>"),
        }
    }
}

#[cfg(not(target_os = "windows"))]
fn main() {
    env_logger::init();
    eprintln!("diagnose needs the Windows raw input backend");
}
