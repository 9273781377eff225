use criterion::{criterion_group, criterion_main, Criterion, SamplingMode};
use std::hint::black_box;
use std::time::Duration;
use tictactoe_engine::tictactoe::{analyze, calculate_best_move, BotInput, Board, GameController, Mark, Side, TurnPhase};

fn bench_full_game() {
    let mut controller = GameController::new();
    while controller.phase() == TurnPhase::HumanTurn {
        let Ok(index) = calculate_best_move(controller.board(), Side::Human) else {
            break;
        };
        if controller.submit_move(index).is_err() {
            break;
        }
        if controller.phase() == TurnPhase::AutomatedTurnPending && controller.play_automated_turn().is_err() {
            break;
        }
    }
}

fn bench_single_move_empty_board() {
    let input = BotInput::new(Board::new(), Side::Human);
    let _ = black_box(analyze(&input));
}

fn bench_single_move_mid_game() {
    let board = Board::from_cells([
        Mark::X, Mark::Empty, Mark::Empty,
        Mark::Empty, Mark::O, Mark::Empty,
        Mark::Empty, Mark::Empty, Mark::X,
    ]);
    let input = BotInput::new(board, Side::Automated);
    let _ = black_box(analyze(&input));
}

fn minimax_bench(c: &mut Criterion) {
    let mut group = c.benchmark_group("minimax");

    group
        .sampling_mode(SamplingMode::Flat)
        .sample_size(20)
        .measurement_time(Duration::from_secs(10));

    group.bench_function("full_game", |b| {
        b.iter(bench_full_game)
    });

    group.bench_function("single_move_empty", |b| {
        b.iter(bench_single_move_empty_board)
    });

    group.bench_function("single_move_mid_game", |b| {
        b.iter(bench_single_move_mid_game)
    });

    group.finish();
}

criterion_group!(benches, minimax_bench);
criterion_main!(benches);
