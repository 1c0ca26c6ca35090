//! Grover search built only from the public gate API.

use std::f64::consts::PI;

use twinstate::core::Simulator;
use twinstate::Result;

/// Phase-flip the basis state `marked`.
fn oracle(sim: &mut Simulator, marked: usize) -> Result<()> {
    let n = sim.num_qubits();
    let controls: Vec<usize> = (0..n - 1).collect();
    for q in (0..n).filter(|q| (marked >> q) & 1 == 0) {
        sim.pauli_x(q)?;
    }
    sim.mcphase(&controls, n - 1)?;
    for q in (0..n).filter(|q| (marked >> q) & 1 == 0) {
        sim.pauli_x(q)?;
    }
    Ok(())
}

/// Reflect about the uniform superposition.
fn diffusion(sim: &mut Simulator) -> Result<()> {
    let n = sim.num_qubits();
    let controls: Vec<usize> = (0..n - 1).collect();
    for q in 0..n {
        sim.hadamard(q)?.pauli_x(q)?;
    }
    sim.mcphase(&controls, n - 1)?;
    for q in 0..n {
        sim.pauli_x(q)?.hadamard(q)?;
    }
    Ok(())
}

fn grover(num_qubits: usize, marked: usize) -> Result<Simulator> {
    let mut sim = Simulator::new(num_qubits)?;
    for q in 0..num_qubits {
        sim.hadamard(q)?;
    }
    let iterations = (PI / 4.0 * ((1usize << num_qubits) as f64).sqrt()).floor() as usize;
    for _ in 0..iterations {
        oracle(&mut sim, marked)?;
        diffusion(&mut sim)?;
    }
    Ok(sim)
}

#[test]
fn test_grover_finds_every_marked_state() -> Result<()> {
    for num_qubits in [2usize, 3, 4] {
        for marked in 0..(1 << num_qubits) {
            let sim = grover(num_qubits, marked)?;
            let outcome = sim.max_amplitude();
            assert_eq!(outcome.basis_state, marked, "{num_qubits} qubits");
            assert!(outcome.probability > 0.9, "p = {}", outcome.probability);
            assert!((sim.total_probability() - 1.0).abs() < 1e-9);
        }
    }
    Ok(())
}

#[test]
fn test_grover_outcome_label() -> Result<()> {
    // marked = 0b0010: only qubit 1 is set
    let sim = grover(4, 0b0010)?;
    assert_eq!(sim.max_amplitude().label(), "0100");
    Ok(())
}

#[test]
fn test_grover_on_parallel_path_agrees() -> Result<()> {
    use twinstate::SimulatorConfig;

    let config = SimulatorConfig::new().with_parallel_threshold(1);
    let mut sim = Simulator::with_config(5, None, config)?;
    for q in 0..5 {
        sim.hadamard(q)?;
    }
    for _ in 0..4 {
        oracle(&mut sim, 0b10110)?;
        diffusion(&mut sim)?;
    }
    let reference = grover(5, 0b10110)?;
    assert_eq!(sim.amplitudes(), reference.amplitudes());
    assert_eq!(sim.max_amplitude().basis_state, 0b10110);
    Ok(())
}
