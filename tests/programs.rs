use claim::{assert_err, assert_matches, assert_ok};

use octet::interpreter::{Interpreter, RunState, StepOutcome};
use octet::opcode::Instruction;
use octet::{Error, Fault};

fn boot(rom: &[u8]) -> Interpreter {
    let mut interpreter = Interpreter::with_seed(7);
    assert_ok!(interpreter.load(rom));
    interpreter
}

fn run_until(interpreter: &mut Interpreter, pc: u16, max_steps: usize) {
    for _ in 0..max_steps {
        if interpreter.registers().pc == pc {
            return;
        }
        assert_ok!(interpreter.step());
    }
    panic!("pc never reached {:#05X}", pc);
}

#[test]
fn test_add_then_clear() {
    let mut interpreter = boot(&[0x60, 0x05, 0x61, 0x05, 0x80, 0x14, 0x00, 0xE0]);

    for _ in 0..4 {
        assert_ok!(interpreter.step());
    }

    let registers = interpreter.registers();
    assert_eq!(registers.v[0], 0x0A);
    assert_eq!(registers.flag(), 0);
    assert_eq!(registers.pc, 0x208);
    assert!(interpreter.display().pixels().iter().all(|p| !p));
}

#[test]
fn test_counting_loop_with_bcd() {
    let rom: &[u8] = &[
        0x60, 0x00, // LD V0, 0
        0x70, 0x01, // ADD V0, 1
        0x30, 0x0C, // SE V0, 12
        0x12, 0x02, // JP 0x202
        0xA3, 0x00, // LD I, 0x300
        0xF0, 0x33, // LD B, V0
        0xF2, 0x65, // LD V2, [I]
        0x12, 0x0E, // JP 0x20E
    ];
    let mut interpreter = boot(rom);

    run_until(&mut interpreter, 0x20E, 100);

    assert_eq!(interpreter.registers().v[..3], [0, 1, 2]);
    assert_eq!(interpreter.registers().i, 0x300);

    // Spinning on the final jump leaves everything in place.
    assert_eq!(
        assert_ok!(interpreter.step()),
        StepOutcome::Executed(Instruction::Jump(0x20E))
    );
    assert_eq!(interpreter.registers().pc, 0x20E);
}

#[test]
fn test_call_return_for_any_target() {
    for target in (0x204u16..0x1000).step_by(0x1F6) {
        let mut rom = vec![0; usize::from(target) - 0x200 + 2];
        rom[..2].copy_from_slice(&(0x2000 | target).to_be_bytes());
        rom[usize::from(target) - 0x200..].copy_from_slice(&[0x00, 0xEE]);
        let mut interpreter = boot(&rom);

        assert_ok!(interpreter.step());
        assert_eq!(interpreter.registers().pc, target);
        assert_ok!(interpreter.step());
        assert_eq!(interpreter.registers().pc, 0x202);
        assert_eq!(interpreter.stack_depth(), 0);
    }
}

#[test]
fn test_draw_digit_from_font() {
    let rom: &[u8] = &[
        0x60, 0x01, // LD V0, 1
        0xF0, 0x29, // LD F, V0
        0x61, 0x00, // LD V1, 0
        0xD1, 0x15, // DRW V1, V1, 5
    ];
    let mut interpreter = boot(rom);

    for _ in 0..4 {
        assert_ok!(interpreter.step());
    }

    let text = interpreter.display().to_text();
    let rows: Vec<&str> = text.lines().take(5).map(|row| &row[..8]).collect();
    assert_eq!(rows, ["..#.....", ".##.....", "..#.....", "..#.....", ".###...."]);
}

#[test]
fn test_wait_for_key_then_continue() {
    let rom: &[u8] = &[
        0xF3, 0x0A, // LD V3, K
        0xE3, 0x9E, // SKP V3
        0x12, 0x04, // JP 0x204
        0x12, 0x06, // JP 0x206
    ];
    let mut interpreter = boot(rom);

    assert_ok!(interpreter.step());
    assert_eq!(assert_ok!(interpreter.step()), StepOutcome::AwaitingKey);

    interpreter.keyboard_mut().press_key(0xB);
    assert!(interpreter.keyboard().is_pressed(0xB));
    assert_eq!(assert_ok!(interpreter.step()), StepOutcome::KeyPressed(0xB));
    assert_eq!(interpreter.state(), RunState::Running);

    assert_ok!(interpreter.step());
    assert_eq!(interpreter.registers().pc, 0x206);
}

#[test]
fn test_runaway_recursion_halts() {
    let mut interpreter = boot(&[0x22, 0x00]);

    let err = loop {
        if let Err(err) = interpreter.step() {
            break err;
        }
    };

    assert_matches!(err, Error::Cycle { fault: Fault::StackOverflow, .. });
    assert_eq!(interpreter.stack_depth(), 16);
    assert_eq!(interpreter.state(), RunState::Halted);
    assert_eq!(assert_ok!(interpreter.step()), StepOutcome::Halted);
}

#[test]
fn test_oversized_program_is_rejected() {
    let mut interpreter = Interpreter::with_seed(7);

    let err = assert_err!(interpreter.load(&[0u8; 0xE01]));

    assert_eq!(err, Error::ProgramLoad { size: 0xE01, max: 0xE00 });
}
