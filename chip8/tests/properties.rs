use chip8::{
    graphics::{HEIGHT, WIDTH},
    memory::{MAX_PROGRAM_SIZE, MEMORY_SIZE},
    Chip8, Chip8Error, ScriptedRandom, StepOutcome,
};

fn machine(program: &[u8]) -> Chip8<ScriptedRandom> {
    let mut chip8 = Chip8::with_random(ScriptedRandom::default());
    chip8.load_program(program).unwrap();
    chip8
}

fn lit_pixels(chip8: &Chip8<ScriptedRandom>) -> usize {
    chip8
        .display()
        .iter()
        .flatten()
        .filter(|&&pixel| pixel == 1)
        .count()
}

#[test]
fn non_branching_steps_advance_by_two() {
    // LD V1, 5; ADD V1, 3; LD I, 0x300; OR V1, V2; LD DT, V1
    let mut chip8 = machine(&[0x61, 0x05, 0x71, 0x03, 0xA3, 0x00, 0x81, 0x21, 0xF1, 0x15]);
    for _ in 0..5 {
        let before = chip8.processor.pc;
        assert_eq!(chip8.step().unwrap(), StepOutcome::Executed);
        assert_eq!(chip8.processor.pc, before + 2);
    }
}

#[test]
fn drawing_twice_erases_and_collides() {
    // LD I, font(0); DRW V0, V1, 5; DRW V0, V1, 5
    let mut chip8 = machine(&[0xA0, 0x00, 0xD0, 0x15, 0xD0, 0x15]);
    chip8.step().unwrap();
    assert!(chip8.take_draw_flag());

    chip8.step().unwrap();
    assert_eq!(chip8.processor.v[0xF], 0);
    assert!(lit_pixels(&chip8) > 0);
    assert!(chip8.take_draw_flag());
    assert!(!chip8.take_draw_flag());

    chip8.step().unwrap();
    assert_eq!(chip8.processor.v[0xF], 1);
    assert_eq!(lit_pixels(&chip8), 0);
    assert!(chip8.take_draw_flag());
}

#[test]
fn sprite_wraps_past_right_edge() {
    // V0 = 63; V1 = 0; I = 0x20A; DRW V0, V1, 1; sprite 0b1100_0000
    let mut chip8 = machine(&[0x60, 0x3F, 0x61, 0x00, 0xA2, 0x0A, 0xD0, 0x11, 0x00, 0x00, 0xC0]);
    for _ in 0..4 {
        chip8.step().unwrap();
    }
    let display = chip8.display();
    assert_eq!(display[0][63], 1);
    assert_eq!(display[0][0], 1);
    assert_eq!(display[0][1], 0);
    assert_eq!(lit_pixels(&chip8), 2);
}

#[test]
fn sprite_position_wraps_modulo_screen() {
    // V0 = 64 + 3; V1 = 32 + 2; I = font(0); DRW V0, V1, 1
    let mut chip8 = machine(&[0x60, 0x43, 0x61, 0x22, 0xA0, 0x00, 0xD0, 0x11]);
    for _ in 0..4 {
        chip8.step().unwrap();
    }
    // first font row is 0xF0
    assert_eq!(&chip8.display()[2][3..8], &[1, 1, 1, 1, 0]);
    assert_eq!(chip8.display().len(), HEIGHT);
    assert_eq!(chip8.display()[0].len(), WIDTH);
}

#[test]
fn largest_program_fills_memory() {
    let mut image = vec![0x11; MAX_PROGRAM_SIZE];
    image[MAX_PROGRAM_SIZE - 1] = 0x99;
    let mut chip8 = Chip8::new();
    chip8.load_program(&image).unwrap();
    assert_eq!(chip8.bus.memory[MEMORY_SIZE - 1], 0x99);
}

#[test]
fn oversized_program_is_rejected() {
    let mut chip8 = Chip8::new();
    let result = chip8.load_program(&vec![0x11; MAX_PROGRAM_SIZE + 1]);
    assert!(matches!(
        result,
        Err(Chip8Error::ProgramTooLarge {
            size: 3585,
            max_size: 3584
        })
    ));
    assert_eq!(chip8.bus.memory[0x200], 0);
}

#[test]
fn key_wait_blocks_until_a_key_is_down() {
    // LD DT, V0 (V0 = 10); LD V4, K
    let mut chip8 = machine(&[0x60, 0x0A, 0xF0, 0x15, 0xF4, 0x0A]);
    chip8.step().unwrap();
    chip8.step().unwrap();
    let delay = chip8.delay_timer();
    assert_eq!(delay, 9);

    for _ in 0..5 {
        assert_eq!(chip8.step().unwrap(), StepOutcome::WaitingForKey);
        assert_eq!(chip8.processor.pc, 0x204);
        assert_eq!(chip8.delay_timer(), delay);
        assert_eq!(chip8.processor.v[4], 0);
    }

    chip8.key_down(0xE);
    assert_eq!(chip8.step().unwrap(), StepOutcome::Executed);
    assert_eq!(chip8.processor.v[4], 0xE);
    assert_eq!(chip8.processor.pc, 0x206);
    assert_eq!(chip8.delay_timer(), delay - 1);

    chip8.key_up(0xE);
    assert_eq!(chip8.bus.input.is_key_pressed(0xE), Some(false));
}

#[test]
fn delay_timer_never_underflows() {
    // jump to self
    let mut chip8 = machine(&[0x12, 0x00]);
    for _ in 0..300 {
        chip8.step().unwrap();
        assert_eq!(chip8.delay_timer(), 0);
    }
}

#[test]
fn bcd_of_156() {
    // V2 = 156; I = 0x300; LD B, V2
    let mut chip8 = machine(&[0x62, 0x9C, 0xA3, 0x00, 0xF2, 0x33]);
    for _ in 0..3 {
        chip8.step().unwrap();
    }
    let memory = &chip8.bus.memory;
    assert_eq!((memory[0x300], memory[0x301], memory[0x302]), (1, 5, 6));
}

#[test]
fn soft_invalid_opcode_stalls_forever() {
    let mut chip8 = machine(&[0x80, 0x0F]);
    for _ in 0..3 {
        assert_eq!(
            chip8.step().unwrap(),
            StepOutcome::Stalled { opcode: 0x800F }
        );
        assert_eq!(chip8.processor.pc, 0x200);
    }
    assert!(!chip8.is_halted());
}

#[test]
fn strict_config_halts_on_soft_invalid_opcode() {
    let mut chip8 =
        Chip8::with_random(ScriptedRandom::default()).with_config(chip8::Config::strict());
    chip8.load_program(&[0x80, 0x0F]).unwrap();
    assert!(matches!(
        chip8.step(),
        Err(Chip8Error::InvalidOpcode {
            opcode: 0x800F,
            address: 0x200
        })
    ));
    assert!(chip8.is_halted());
}

#[test]
fn running_off_the_end_of_memory_halts() {
    let mut chip8 = machine(&[0x1F, 0xFE]);
    // LD V0, 1 in the very last word of memory
    chip8.bus.memory.write(0xFFE, &[0x60, 0x01]).unwrap();
    chip8.step().unwrap();
    assert_eq!(chip8.processor.pc, 0xFFE);
    assert!(matches!(
        chip8.step(),
        Err(Chip8Error::MemoryOutOfBounds { address: 0x1000 })
    ));
    assert!(matches!(chip8.step(), Err(Chip8Error::Halted)));
}

#[test]
fn clear_ignores_the_middle_nibble() {
    // LD I, font(0); DRW V0, V0, 5; CLS spelled 01E0
    let mut chip8 = machine(&[0xA0, 0x00, 0xD0, 0x05, 0x01, 0xE0]);
    chip8.step().unwrap();
    chip8.step().unwrap();
    assert!(lit_pixels(&chip8) > 0);
    assert_eq!(chip8.step().unwrap(), StepOutcome::Executed);
    assert_eq!(lit_pixels(&chip8), 0);
    assert_eq!(chip8.processor.pc, 0x206);
    assert!(!chip8.is_halted());
}

#[test]
fn unknown_system_call_halts() {
    let mut chip8 = machine(&[0x02, 0x34]);
    assert!(matches!(
        chip8.step(),
        Err(Chip8Error::InvalidOpcode {
            opcode: 0x0234,
            address: 0x200
        })
    ));
    assert!(chip8.is_halted());
}

#[test]
fn random_uses_injected_source() {
    let mut chip8 = Chip8::with_random(ScriptedRandom::new([0x5A, 0xFF]));
    // RND V0, 0xF0; RND V1, 0x0F
    chip8.load_program(&[0xC0, 0xF0, 0xC1, 0x0F]).unwrap();
    chip8.step().unwrap();
    chip8.step().unwrap();
    assert_eq!(chip8.processor.v[0], 0x50);
    assert_eq!(chip8.processor.v[1], 0x0F);
}
