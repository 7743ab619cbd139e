#![allow(dead_code)]

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use hierpcb_board::{
    ArcTrack, Board, BoardError, BoardLoader, CopperItem, Footprint, FootprintPath,
    FootprintText, ItemId, Net, Pad, TextKind, Track, Via,
};
use hierpcb_hierarchy::{Hierarchy, SheetPath, SubLayoutBinding};

pub const KEY_LAYOUT: &str = "/proj/key.kicad_pcb";

/// In-memory documents keyed by path, counting loads.
#[derive(Default)]
pub struct MemoryLoader {
    boards: HashMap<PathBuf, Board>,
    loads: AtomicUsize,
}

impl MemoryLoader {
    pub fn with(mut self, path: &str, board: Board) -> Self {
        self.boards.insert(PathBuf::from(path), board);
        self
    }

    pub fn loads(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }
}

impl BoardLoader for MemoryLoader {
    fn load(&self, path: &Path) -> Result<Board, BoardError> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        self.boards.get(path).cloned().ok_or_else(|| BoardError::Io {
            path: path.to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such board"),
        })
    }
}

pub fn sheet(raw: &str) -> SheetPath {
    raw.parse().unwrap()
}

pub fn pad(number: &str, net: u32) -> Pad {
    Pad {
        number: number.into(),
        net,
    }
}

pub fn footprint(id: &str, reference: &str, path: &str, at: [f64; 3]) -> Footprint {
    let mut fp = Footprint::new(id, reference);
    fp.path = Some(FootprintPath::parse(path));
    fp.position = [at[0], at[1]];
    fp.rotation = at[2];
    fp
}

fn on_sheet(mut fp: Footprint, file: &str, name: &str) -> Footprint {
    fp.sheet_file = Some(file.into());
    fp.sheet_name = Some(name.into());
    fp
}

fn net(code: u32, name: &str) -> Net {
    Net {
        code,
        name: name.into(),
    }
}

/// One key: switch SW1 at the origin, diode D1 two units right of it, and a
/// capacitor staged left of the origin.
pub fn key_layout() -> Board {
    let mut sw = footprint("sub-sw", "SW1", "/sw1", [0.0, 0.0, 0.0]);
    sw.size = [14.0, 14.0];
    sw.pads = vec![pad("1", 2), pad("2", 3)];
    sw.properties.local_clearance = Some(0.3);

    let mut d = footprint("sub-d", "D1", "/d1", [2.0, 0.0, 0.0]);
    d.size = [3.0, 1.5];
    d.pads = vec![pad("1", 3), pad("2", 1)];
    d.texts = vec![FootprintText {
        kind: TextKind::Reference,
        position: [2.0, -1.0],
        visible: false,
    }];

    let mut c = footprint("sub-c", "C99", "/c99", [-5.0, 3.0, 0.0]);
    c.size = [20.0, 20.0];

    Board {
        nets: vec![
            net(1, "ROW"),
            net(2, "COL"),
            net(3, "Net-(D1-A)"),
            net(4, "LOCAL"),
        ],
        footprints: vec![sw, d, c],
        copper: vec![
            CopperItem::Track(Track {
                id: ItemId::new("sub-t1"),
                start: [0.0, 0.0],
                end: [2.0, 0.0],
                width: 0.25,
                layer: "F.Cu".into(),
                net: 3,
            }),
            CopperItem::Via(Via {
                id: ItemId::new("sub-v1"),
                position: [1.0, 1.0],
                size: 0.6,
                drill: 0.3,
                layers: ["F.Cu".into(), "B.Cu".into()],
                net: 1,
            }),
            CopperItem::Arc(ArcTrack {
                id: ItemId::new("sub-a1"),
                start: [0.0, 2.0],
                mid: [1.0, 3.0],
                end: [2.0, 2.0],
                width: 0.2,
                layer: "B.Cu".into(),
                net: 4,
            }),
        ],
        groups: Vec::new(),
    }
}

/// Main board: top sheet `T` holding two key instances, `keyA` at `/t/ka`
/// and `keyB` at `/t/kb`. `keyB` lacks its diode and has an extra LED.
pub fn main_board() -> Board {
    let key_a = |fp| on_sheet(fp, "key.kicad_sch", "keyA");
    let key_b = |fp| on_sheet(fp, "key.kicad_sch", "keyB");

    let mut sw_a = key_a(footprint("sw-a", "SW1", "/t/ka/sw1", [10.0, 20.0, 90.0]));
    sw_a.pads = vec![pad("1", 12), pad("2", 13)];
    let mut d_a = key_a(footprint("d-a", "D1", "/t/ka/d1", [70.0, 70.0, 45.0]));
    d_a.pads = vec![pad("1", 13), pad("2", 11)];
    d_a.texts = vec![FootprintText {
        kind: TextKind::Reference,
        position: [70.0, 68.0],
        visible: true,
    }];
    let c_a = key_a(footprint("c-a", "C99", "/t/ka/c99", [80.0, 80.0, 0.0]));

    let mut sw_b = key_b(footprint("sw-b", "SW2", "/t/kb/sw1", [30.0, 20.0, 0.0]));
    sw_b.pads = vec![pad("1", 12), pad("2", 14)];
    let led_b = key_b(footprint("led-b", "LED2", "/t/kb/led", [90.0, 90.0, 0.0]));

    let mcu = on_sheet(
        footprint("mcu", "U1", "/t/u1", [100.0, 100.0, 0.0]),
        "top.kicad_sch",
        "T",
    );

    Board {
        nets: vec![
            net(11, "ROW0"),
            net(12, "COL0"),
            net(13, "/T/keyA/Net-(D1-A)"),
            net(14, "/T/keyB/Net-(D1-A)"),
        ],
        footprints: vec![sw_a, d_a, c_a, sw_b, led_b, mcu],
        copper: Vec::new(),
        groups: Vec::new(),
    }
}

/// Hierarchy of `main` where only the files in `layouts` exist.
pub fn hierarchy_with(main: &Board, layouts: &[&str]) -> Hierarchy {
    let binding = SubLayoutBinding::new("/proj", "kicad_pcb");
    Hierarchy::from_board_with(main, &binding, |p| {
        layouts.iter().any(|l| p == Path::new(l))
    })
}

pub fn hierarchy(main: &Board) -> Hierarchy {
    hierarchy_with(main, &[KEY_LAYOUT])
}

pub fn fp<'a>(board: &'a Board, id: &str) -> &'a Footprint {
    board.footprint(&ItemId::new(id)).unwrap()
}
