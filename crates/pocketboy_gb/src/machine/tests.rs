use std::cell::RefCell;
use std::rc::Rc;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use super::*;
use crate::cpu::{CpuError, Interrupt, InterruptController};

/// 32 KiB no-mapper image with `program` at the entry point and a valid
/// header checksum.
fn rom_with(program: &[u8]) -> Vec<u8> {
    let mut rom = vec![0u8; 0x8000];
    rom[0x134..0x134 + 11].copy_from_slice(b"POCKET TEST");
    rom[0x147] = NoMbc::KIND;
    rom[0x100..0x100 + program.len()].copy_from_slice(program);
    rom[0x14D] = Header::compute_checksum(&rom).unwrap();
    rom
}

fn ppu_with_vram() -> (Ppu, AddressSpace, Rc<RefCell<InterruptController>>, Arc<Lcd>) {
    let interrupts = Rc::new(RefCell::new(InterruptController::new()));
    let lcd = Arc::new(Lcd::new());
    let ppu = Ppu::new(Rc::clone(&interrupts), Arc::clone(&lcd));
    let mut bus = AddressSpace::new();
    bus.attach(&Rc::new(RefCell::new(Ram::video()))).unwrap();
    (ppu, bus, interrupts, lcd)
}

fn step_ppu(ppu: &mut Ppu, bus: &AddressSpace, cycles: u32) {
    let mut left = cycles;
    while left > 0 {
        let chunk = left.min(4);
        ppu.step(chunk, bus).unwrap();
        left -= chunk;
    }
}

// ---------------------------------------------------------------------------
// Bus
// ---------------------------------------------------------------------------

#[test]
fn words_round_trip_through_every_writable_device() {
    let mut gb = GameBoy::new(rom_with(&[])).unwrap();
    let bus = gb.bus_mut();

    // VRAM, WRAM, echo, OAM, PPU registers (SCY/SCX), HRAM, and HRAM+IE.
    for address in [0x8000, 0x9FFE, 0xC000, 0xDFFE, 0xE010, 0xFE00, 0xFF42, 0xFF80, 0xFFFE] {
        bus.write_word(address, 0xBEEF).unwrap();
        assert_eq!(bus.read_word(address).unwrap(), 0xBEEF, "at 0x{address:04X}");
    }
}

#[test]
fn words_are_little_endian() {
    let mut gb = GameBoy::new(rom_with(&[])).unwrap();
    let bus = gb.bus_mut();
    bus.write_word(0xC100, 0x1234).unwrap();
    assert_eq!(bus.read_byte(0xC100).unwrap(), 0x34);
    assert_eq!(bus.read_byte(0xC101).unwrap(), 0x12);
}

#[test]
fn overlapping_ranges_are_rejected() {
    let mut bus = AddressSpace::new();
    bus.attach(&Rc::new(RefCell::new(Ram::video()))).unwrap();

    let clashing = Rc::new(RefCell::new(Ram::new(
        "clash",
        vec![AddressRange::new(0x9000, 0xA000)],
    )));
    assert_eq!(
        bus.attach(&clashing),
        Err(BusError::Overlap {
            existing: AddressRange::new(0x8000, 0x9FFF),
            requested: AddressRange::new(0x9000, 0xA000),
        })
    );

    let disjoint = Rc::new(RefCell::new(Ram::new(
        "disjoint",
        vec![AddressRange::new(0xA000, 0xBFFF)],
    )));
    assert!(bus.attach(&disjoint).is_ok());
}

#[test]
fn failed_attach_maps_nothing() {
    let mut bus = AddressSpace::new();
    bus.attach(&Rc::new(RefCell::new(Ram::video()))).unwrap();

    let half_clash = Rc::new(RefCell::new(Ram::new(
        "half",
        vec![
            AddressRange::new(0xA000, 0xA0FF),
            AddressRange::new(0x9F00, 0x9FFF),
        ],
    )));
    assert!(bus.attach(&half_clash).is_err());
    assert_eq!(bus.ranges().count(), 1);
    assert_eq!(
        bus.read_byte(0xA000),
        Err(BusError::Unmapped { address: 0xA000 })
    );
}

#[test]
fn unmapped_access_is_an_error() {
    let mut gb = GameBoy::new(rom_with(&[])).unwrap();
    let bus = gb.bus_mut();
    assert_eq!(
        bus.read_byte(0xA123),
        Err(BusError::Unmapped { address: 0xA123 })
    );
    assert_eq!(
        bus.write_byte(0xBFFF, 1),
        Err(BusError::Unmapped { address: 0xBFFF })
    );
}

#[test]
fn rom_writes_are_rejected() {
    let mut gb = GameBoy::new(rom_with(&[])).unwrap();
    assert_eq!(
        gb.bus_mut().write_byte(0x2000, 0x01),
        Err(BusError::ReadOnly {
            device: "cartridge",
            address: 0x2000
        })
    );
}

#[test]
fn interrupt_registers_are_bus_mapped() {
    let mut gb = GameBoy::new(rom_with(&[])).unwrap();
    gb.bus_mut().write_byte(0xFFFF, 0x05).unwrap();
    gb.cpu().interrupts().borrow_mut().request(Interrupt::TIMER);
    assert_eq!(gb.bus().read_byte(0xFF0F).unwrap(), 0xE4);
    assert_eq!(
        gb.cpu().interrupts().borrow().enabled(),
        Interrupt::VBLANK | Interrupt::TIMER
    );
}

// ---------------------------------------------------------------------------
// Cartridge
// ---------------------------------------------------------------------------

#[test]
fn short_image_is_too_small() {
    let err = Cartridge::new(vec![0; 0x147]).unwrap_err();
    assert_eq!(err, CartridgeError::TooSmall { len: 0x147 });
}

#[test]
fn banked_cartridge_is_unsupported() {
    let mut rom = rom_with(&[]);
    rom[0x147] = 0x01;
    let err = Cartridge::new(rom).unwrap_err();
    assert_eq!(err, CartridgeError::Unsupported { kind: 0x01 });
}

#[test]
fn title_stops_at_nul_or_field_end() {
    let cart = Cartridge::new(rom_with(&[])).unwrap();
    assert_eq!(cart.title(), "POCKET TEST");

    let mut rom = rom_with(&[]);
    rom[0x134..=0x143].copy_from_slice(b"SIXTEEN CHARS!!!");
    rom[0x144] = b'X';
    let cart = Cartridge::new(rom).unwrap();
    assert_eq!(cart.title(), "SIXTEEN CHARS!!!");
}

#[test]
fn header_checksum_is_verified() {
    let rom = rom_with(&[]);
    let header = Header::parse(&rom).unwrap();
    assert_eq!(header.checksum_ok(&rom), Some(true));

    let mut bad = rom.clone();
    bad[0x14D] = bad[0x14D].wrapping_add(1);
    let header = Header::parse(&bad).unwrap();
    assert_eq!(header.checksum_ok(&bad), Some(false));

    // A bad checksum is only a warning.
    assert!(Cartridge::new(bad).is_ok());
}

#[test]
fn minimal_image_reads_open_bus_past_its_end() {
    let rom = vec![0u8; 0x148];
    let cart = Cartridge::new(rom).unwrap();
    assert_eq!(cart.header().header_checksum, None);
    assert_eq!(cart.read_byte(0x0147).unwrap(), 0x00);
    assert_eq!(cart.read_byte(0x0148).unwrap(), 0xFF);
    assert_eq!(cart.read_byte(0x7FFF).unwrap(), 0xFF);
    assert!(matches!(
        cart.read_byte(0x8000),
        Err(BusError::OutOfRange { .. })
    ));
}

// ---------------------------------------------------------------------------
// PPU
// ---------------------------------------------------------------------------

#[test]
fn one_line_of_cycles_advances_ly() {
    let (mut ppu, bus, _, _) = ppu_with_vram();
    ppu.step(456, &bus).unwrap();
    assert_eq!(ppu.ly(), 1);
    assert_eq!(ppu.dots(), 0);
}

#[test]
fn ly_wraps_after_vblank_lines() {
    let (mut ppu, bus, _, _) = ppu_with_vram();
    for _ in 0..TOTAL_LINES - 1 {
        ppu.step(DOTS_PER_LINE, &bus).unwrap();
    }
    assert_eq!(ppu.ly(), VISIBLE_LINES + VBLANK_LINES - 1);
    ppu.step(DOTS_PER_LINE, &bus).unwrap();
    assert_eq!(ppu.ly(), 0);
}

#[test]
fn vblank_is_raised_exactly_once_per_frame() {
    let (mut ppu, bus, interrupts, lcd) = ppu_with_vram();
    let ready = lcd.frame_ready();

    step_ppu(&mut ppu, &bus, 143 * 456);
    assert_eq!(ppu.ly(), 143);
    assert!(interrupts.borrow().requested().is_empty());
    assert!(ready.try_recv().is_err());

    step_ppu(&mut ppu, &bus, 456);
    assert_eq!(ppu.ly(), 144);
    assert_eq!(ppu.mode(), Mode::VBlank);
    assert_eq!(interrupts.borrow().requested(), Interrupt::VBLANK);
    assert!(ready.try_recv().is_ok());
    assert!(ready.try_recv().is_err());
    assert_eq!(ppu.frames(), 1);

    // The rest of VBlank does not raise it again.
    interrupts.borrow_mut().clear(Interrupt::VBLANK);
    step_ppu(&mut ppu, &bus, 10 * 456);
    assert_eq!(ppu.ly(), 0);
    assert!(interrupts.borrow().requested().is_empty());
    assert!(ready.try_recv().is_err());
}

#[test]
fn a_single_large_step_still_renders_and_signals() {
    let (mut ppu, bus, interrupts, lcd) = ppu_with_vram();
    ppu.write_byte(0xFF40, 0x91).unwrap();
    ppu.step(144 * 456, &bus).unwrap();
    assert_eq!(ppu.ly(), 144);
    assert_eq!(ppu.frames(), 1);
    assert!(interrupts.borrow().requested().contains(Interrupt::VBLANK));
    assert!(lcd.frame_ready().try_recv().is_ok());
}

/// Tile 1 at $8010: row 0 is colour 1 everywhere, row 1 colour 3.
fn load_test_tile(bus: &mut AddressSpace, base: u16) {
    bus.write_byte(base, 0xFF).unwrap();
    bus.write_byte(base + 1, 0x00).unwrap();
    bus.write_byte(base + 2, 0xFF).unwrap();
    bus.write_byte(base + 3, 0xFF).unwrap();
}

#[test]
fn background_line_uses_map_tiles_and_palette() {
    let (mut ppu, mut bus, _, lcd) = ppu_with_vram();
    load_test_tile(&mut bus, 0x8010);
    bus.write_byte(0x9800, 0x01).unwrap();
    ppu.write_byte(0xFF40, 0x91).unwrap();
    ppu.write_byte(0xFF47, 0xE4).unwrap();

    // Line 0 is drawn on entering pixel transfer, line 1 on the next line.
    ppu.step(80, &bus).unwrap();
    step_ppu(&mut ppu, &bus, 456);

    let screen = lcd.snapshot();
    assert_eq!(&screen[0][0..8], &[1; 8]);
    assert_eq!(&screen[0][8..16], &[0; 8]);
    assert_eq!(&screen[1][0..8], &[3; 8]);
}

#[test]
fn background_scroll_and_palette_mapping() {
    let (mut ppu, mut bus, _, lcd) = ppu_with_vram();
    load_test_tile(&mut bus, 0x8010);
    bus.write_byte(0x9800, 0x01).unwrap();
    ppu.write_byte(0xFF40, 0x91).unwrap();
    // Reversed palette: colour 1 -> shade 2, colour 0 -> shade 3.
    ppu.write_byte(0xFF47, 0x1B).unwrap();
    ppu.write_byte(0xFF43, 4).unwrap();
    ppu.write_byte(0xFF42, 1).unwrap();

    ppu.step(80, &bus).unwrap();

    let line = lcd.snapshot()[0];
    // SCY=1 selects tile row 1 (colour 3 -> shade 0); SCX=4 leaves 4 pixels of the tile.
    assert_eq!(&line[0..4], &[0; 4]);
    assert_eq!(&line[4..12], &[3; 8]);
}

#[test]
fn signed_tile_data_counts_from_9000() {
    let (mut ppu, mut bus, _, lcd) = ppu_with_vram();
    // Tile 0 with signed addressing lives at $9000: colour 2 on row 0.
    bus.write_byte(0x9000, 0x00).unwrap();
    bus.write_byte(0x9001, 0xFF).unwrap();
    // Tile 0 with unsigned addressing would be $8000, left blank.
    ppu.write_byte(0xFF40, 0x81).unwrap();
    ppu.write_byte(0xFF47, 0xE4).unwrap();

    ppu.step(80, &bus).unwrap();
    assert_eq!(lcd.snapshot()[0], [2; crate::SCREEN_WIDTH]);
}

#[test]
fn alternate_tile_map_is_selected_by_lcdc_bit_3() {
    let (mut ppu, mut bus, _, lcd) = ppu_with_vram();
    load_test_tile(&mut bus, 0x8010);
    bus.write_byte(0x9C00, 0x01).unwrap();
    ppu.write_byte(0xFF40, 0x99).unwrap();
    ppu.write_byte(0xFF47, 0xE4).unwrap();

    ppu.step(80, &bus).unwrap();
    assert_eq!(&lcd.snapshot()[0][0..8], &[1; 8]);
}

#[test]
fn disabled_background_draws_shade_zero() {
    let (mut ppu, mut bus, _, lcd) = ppu_with_vram();
    load_test_tile(&mut bus, 0x8010);
    bus.write_byte(0x9800, 0x01).unwrap();
    ppu.write_byte(0xFF40, 0x90).unwrap();
    ppu.write_byte(0xFF47, 0x1B).unwrap();

    ppu.step(80, &bus).unwrap();
    assert_eq!(lcd.snapshot()[0], [0; crate::SCREEN_WIDTH]);
}

#[test]
fn stat_reports_mode_and_coincidence() {
    let (mut ppu, bus, _, _) = ppu_with_vram();
    ppu.write_byte(0xFF45, 0).unwrap();
    assert_eq!(ppu.read_byte(0xFF41).unwrap(), 0x80 | 0x04 | 2);

    ppu.step(OAM_SCAN_DOTS, &bus).unwrap();
    assert_eq!(ppu.read_byte(0xFF41).unwrap() & 0x03, 3);
    ppu.step(TRANSFER_END_DOT - OAM_SCAN_DOTS, &bus).unwrap();
    assert_eq!(ppu.read_byte(0xFF41).unwrap() & 0x03, 0);

    ppu.step(204, &bus).unwrap();
    assert_eq!(ppu.ly(), 1);
    assert_eq!(ppu.read_byte(0xFF41).unwrap() & 0x07, 2);

    // Only the select bits are writable.
    ppu.write_byte(0xFF41, 0xFF).unwrap();
    assert_eq!(ppu.read_byte(0xFF41).unwrap(), 0xFA);
}

#[test]
fn ly_is_read_only() {
    let (mut ppu, bus, _, _) = ppu_with_vram();
    ppu.step(456 * 3, &bus).unwrap();
    ppu.write_byte(0xFF44, 0x00).unwrap();
    assert_eq!(ppu.read_byte(0xFF44).unwrap(), 3);
}

#[test]
fn lyc_match_raises_stat_on_the_rising_edge() {
    let (mut ppu, bus, interrupts, _) = ppu_with_vram();
    ppu.write_byte(0xFF45, 2).unwrap();
    ppu.write_byte(0xFF41, StatSelect::LYC.bits()).unwrap();

    step_ppu(&mut ppu, &bus, 2 * 456);
    assert_eq!(ppu.ly(), 2);
    assert_eq!(interrupts.borrow().requested(), Interrupt::LCD_STAT);

    // Staying on the matching line keeps the line high: no new request.
    interrupts.borrow_mut().clear(Interrupt::LCD_STAT);
    step_ppu(&mut ppu, &bus, 400);
    assert!(interrupts.borrow().requested().is_empty());

    // Next line drops it; the match on the next frame raises it again.
    step_ppu(&mut ppu, &bus, 56 + 152 * 456);
    assert_eq!(ppu.ly(), 1);
    interrupts.borrow_mut().clear(Interrupt::VBLANK);
    assert!(interrupts.borrow().requested().is_empty());
    step_ppu(&mut ppu, &bus, 456);
    assert_eq!(interrupts.borrow().requested(), Interrupt::LCD_STAT);
}

#[test]
fn hblank_select_raises_stat_each_visible_line() {
    let (mut ppu, bus, interrupts, _) = ppu_with_vram();
    ppu.write_byte(0xFF41, StatSelect::HBLANK.bits()).unwrap();

    step_ppu(&mut ppu, &bus, 252);
    assert_eq!(interrupts.borrow().requested(), Interrupt::LCD_STAT);
    interrupts.borrow_mut().clear(Interrupt::LCD_STAT);

    step_ppu(&mut ppu, &bus, 456);
    assert_eq!(interrupts.borrow().requested(), Interrupt::LCD_STAT);
}

#[test]
fn oam_is_bus_addressable() {
    let (mut ppu, _, _, _) = ppu_with_vram();
    ppu.write_byte(0xFE9F, 0x42).unwrap();
    assert_eq!(ppu.read_byte(0xFE9F).unwrap(), 0x42);
    assert!(ppu.read_byte(0xFEA0).is_err());
}

// ---------------------------------------------------------------------------
// Machine and driver loop
// ---------------------------------------------------------------------------

/// LD SP,$FFFE ; LD A,1 ; LDH (IE),A ; EI ; HALT ; JR -3
const VBLANK_COUNTER: &[u8] = &[
    0x31, 0xFE, 0xFF, 0x3E, 0x01, 0xE0, 0xFF, 0xFB, 0x76, 0x18, 0xFD,
];

#[test]
fn vblank_handler_runs_once_per_frame() {
    let mut rom = rom_with(VBLANK_COUNTER);
    // VBlank vector: INC B ; RETI
    rom[0x40] = 0x04;
    rom[0x41] = 0xD9;
    let mut gb = GameBoy::new(rom).unwrap();

    let mut guard = 0;
    while gb.frames() < 2 {
        gb.step().unwrap();
        guard += 1;
        assert!(guard < 100_000, "machine never reached two frames");
    }
    assert_eq!(gb.cpu().regs.b, 1);

    // Wake + dispatch, INC B, RETI.
    for _ in 0..3 {
        gb.step().unwrap();
    }
    assert_eq!(gb.cpu().regs.b, 2);
    assert_eq!(gb.cpu().regs.pc, 0x0109);
    assert_eq!(gb.cpu().regs.sp, 0xFFFE);
}

#[test]
fn machine_step_feeds_cpu_cycles_to_the_ppu() {
    // NOP ; JP $0150
    let mut gb = GameBoy::new(rom_with(&[0x00, 0xC3, 0x50, 0x01])).unwrap();
    assert_eq!(gb.step().unwrap(), 4);
    assert_eq!(gb.step().unwrap(), 16);
    assert_eq!(gb.ppu().dots(), 20);
}

#[test]
fn run_stops_at_the_frame_limit() {
    // JR -2
    let gb = GameBoy::new(rom_with(&[0x18, 0xFE])).unwrap();
    let options = EmulatorOptions::builder()
        .throttle(false)
        .max_frames(1)
        .build();
    let mut emulator = Emulator::new(gb, options);

    let summary = emulator.run().unwrap();

    assert_eq!(summary.reason, StopReason::FrameLimit);
    assert_eq!(summary.frames, 1);
    assert_eq!(emulator.machine().ppu().ly(), 144);
    assert!(summary.cycles >= 144 * 456);
}

#[test]
fn raised_stop_flag_ends_the_run_before_any_step() {
    let gb = GameBoy::new(rom_with(&[0x18, 0xFE])).unwrap();
    let mut emulator = Emulator::new(gb, EmulatorOptions::default());
    emulator.stop_handle().store(true, Ordering::Relaxed);

    let summary = emulator.run().unwrap();
    assert_eq!(summary.reason, StopReason::Cancelled);
    assert_eq!(summary.steps, 0);
}

#[test]
fn fatal_errors_end_the_run() {
    let gb = GameBoy::new(rom_with(&[0x00, 0xD3])).unwrap();
    let mut emulator = Emulator::new(gb, EmulatorOptions::builder().throttle(false).build());
    let err = emulator.run().unwrap_err();
    assert!(matches!(
        err,
        EmulatorError::Cpu(CpuError::UnknownOpcode {
            opcode: 0xD3,
            pc: 0x0101
        })
    ));

    // LD A,($A000): external RAM is not mapped.
    let gb = GameBoy::new(rom_with(&[0xFA, 0x00, 0xA0])).unwrap();
    let mut emulator = Emulator::new(gb, EmulatorOptions::builder().throttle(false).build());
    let err = emulator.run().unwrap_err();
    assert!(matches!(
        err,
        EmulatorError::Cpu(CpuError::Bus(BusError::Unmapped { address: 0xA000 }))
    ));
}

#[test]
fn debugger_steps_the_loop_one_request_at_a_time() {
    // INC A, repeated.
    let gb = GameBoy::new(rom_with(&[0x3C; 16])).unwrap();
    let mut emulator = Emulator::new(gb, EmulatorOptions::builder().throttle(false).build());
    let (client, link) = debug_channel();
    emulator.attach_debugger(link);

    let driver = thread::spawn(move || {
        let stepped = (0..3).all(|_| client.next());
        let stopped = client.stop();
        (stepped, stopped)
    });

    let summary = emulator.run().unwrap();

    assert_eq!(driver.join().unwrap(), (true, true));
    assert_eq!(summary.reason, StopReason::Debugger);
    assert_eq!(summary.steps, 3);
    assert_eq!(emulator.machine().cpu().regs.a, 3);
}

#[test]
fn dropped_debug_client_ends_the_run() {
    let gb = GameBoy::new(rom_with(&[0x18, 0xFE])).unwrap();
    let mut emulator = Emulator::new(gb, EmulatorOptions::builder().throttle(false).build());
    let (client, link) = debug_channel();
    emulator.attach_debugger(link);
    drop(client);

    let summary = emulator.run().unwrap();
    assert_eq!(summary.reason, StopReason::Debugger);
    assert_eq!(summary.steps, 0);
}

#[test]
fn stop_flag_ends_a_run_parked_on_an_idle_debugger() {
    let gb = GameBoy::new(rom_with(&[0x18, 0xFE])).unwrap();
    let mut emulator = Emulator::new(gb, EmulatorOptions::builder().throttle(false).build());
    let (client, link) = debug_channel();
    emulator.attach_debugger(link);

    let stop = emulator.stop_handle();
    let canceller = thread::spawn(move || {
        thread::sleep(Duration::from_millis(50));
        stop.store(true, Ordering::Relaxed);
    });

    let (done_tx, done_rx) = crossbeam_channel::bounded(1);
    let watchdog = thread::spawn(move || done_rx.recv_timeout(Duration::from_secs(2)).is_ok());

    let summary = emulator.run().unwrap();
    done_tx.send(()).unwrap();

    canceller.join().unwrap();
    assert!(watchdog.join().unwrap(), "run outlived the stop flag");
    assert_eq!(summary.reason, StopReason::Cancelled);
    assert_eq!(summary.steps, 0);
    drop(client);
}

#[test]
fn throttle_sleeps_only_when_ahead() {
    assert_eq!(
        Throttle::remaining(Duration::from_millis(300)),
        Some(Duration::from_millis(700))
    );
    assert_eq!(Throttle::remaining(Duration::from_secs(1)), None);
    assert_eq!(Throttle::remaining(Duration::from_millis(1500)), None);
}
