#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use modalfx_core::{ClickRegion, Harness, Measurements, ModalConfig};

#[derive(Debug, Arbitrary)]
enum Op {
    Open(u8),
    Close(u8),
    Escape,
    Click(u8, u8),
    Settle(u8),
    Resize,
    Measure(u8, u16),
    Frame,
    Advance(u16),
}

fn type_of(h: &Harness, index: u8) -> String {
    let table = h.coordinator.table();
    let i = usize::from(index) % table.len();
    table.iter().nth(i).map(|d| d.type_id().to_owned()).unwrap_or_default()
}

fuzz_target!(|ops: Vec<Op>| {
    let Ok(mut h) = Harness::new(ModalConfig::default()) else {
        return;
    };
    for op in ops.iter().take(256) {
        match *op {
            Op::Open(t) => {
                let ty = type_of(&h, t);
                h.open(&ty);
            }
            Op::Close(t) => {
                let ty = type_of(&h, t);
                h.close(&ty);
            }
            Op::Escape => {
                h.escape();
            }
            Op::Click(t, r) => {
                let ty = type_of(&h, t);
                let region = match r % 4 {
                    0 => ClickRegion::Overlay,
                    1 => ClickRegion::CloseButton,
                    2 => ClickRegion::OkButton,
                    _ => ClickRegion::Content,
                };
                h.click(&ty, region);
            }
            Op::Settle(t) => {
                let ty = type_of(&h, t);
                h.coordinator.animation_finished(&ty);
            }
            Op::Resize => h.resize(),
            Op::Measure(t, height) => {
                let id = h.id(&type_of(&h, t));
                h.host
                    .set_measurements(id, Measurements::new(60.0, f64::from(height), 60.0, 640.0));
            }
            Op::Frame => {
                h.frame();
            }
            Op::Advance(ms) => h.advance_ms(u64::from(ms)),
        }

        let any_visible = h
            .coordinator
            .instances()
            .iter()
            .any(|i| i.phase().is_visible());
        assert_eq!(h.coordinator.is_scroll_locked(), any_visible);
        assert_eq!(h.coordinator.visible().is_empty(), !any_visible);
    }
});
