#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use hierpcb_board::{Board, CopperItem, Footprint, FootprintPath, ItemId, Net, Pad, Track};

pub fn hierpcb(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_hierpcb"))
        .args(args)
        .env("RUST_LOG", "warn")
        .output()
        .expect("run hierpcb")
}

pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn footprint(id: &str, reference: &str, path: &str, at: [f64; 3], pads: &[(&str, u32)]) -> Footprint {
    let mut fp = Footprint::new(id, reference);
    fp.path = Some(FootprintPath::parse(path));
    fp.position = [at[0], at[1]];
    fp.rotation = at[2];
    fp.pads = pads
        .iter()
        .map(|(number, net)| Pad {
            number: number.to_string(),
            net: *net,
        })
        .collect();
    fp
}

fn in_sheet(mut fp: Footprint, file: &str, name: &str) -> Footprint {
    fp.sheet_file = Some(file.into());
    fp.sheet_name = Some(name.into());
    fp
}

pub fn key_layout() -> Board {
    let mut sw = footprint("s-sw", "SW1", "/sw1", [0.0, 0.0, 0.0], &[("1", 1)]);
    sw.size = [14.0, 14.0];
    Board {
        nets: vec![Net {
            code: 1,
            name: "K".into(),
        }],
        footprints: vec![
            sw,
            footprint("s-d", "D1", "/d1", [2.0, 0.0, 0.0], &[("1", 1)]),
        ],
        copper: vec![CopperItem::Track(Track {
            id: ItemId::new("s-t"),
            start: [0.0, 0.0],
            end: [2.0, 0.0],
            width: 0.25,
            layer: "F.Cu".into(),
            net: 1,
        })],
        groups: Vec::new(),
    }
}

pub fn main_board() -> Board {
    let key = |fp| in_sheet(fp, "key.kicad_sch", "keyA");
    Board {
        nets: vec![Net {
            code: 7,
            name: "/T/keyA/K".into(),
        }],
        footprints: vec![
            key(footprint("m-sw", "SW1", "/t/ka/sw1", [10.0, 20.0, 90.0], &[("1", 7)])),
            key(footprint("m-d", "D1", "/t/ka/d1", [60.0, 60.0, 0.0], &[("1", 7)])),
            in_sheet(
                footprint("m-u", "U1", "/t/u1", [0.0, 50.0, 0.0], &[]),
                "top.kicad_sch",
                "T",
            ),
        ],
        copper: Vec::new(),
        groups: Vec::new(),
    }
}

/// A project directory holding `board.json` and the `key` sub-layout.
pub struct Project {
    pub dir: tempfile::TempDir,
}

impl Project {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        main_board().save(&dir.path().join("board.json")).expect("save board");
        key_layout()
            .save(&dir.path().join("key.kicad_pcb"))
            .expect("save sub-layout");
        Self { dir }
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    pub fn board(&self) -> PathBuf {
        self.path("board.json")
    }

    pub fn arg(path: &Path) -> String {
        path.to_string_lossy().into_owned()
    }
}
