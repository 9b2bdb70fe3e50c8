use maze_duel_core::{
    Command, Direction, ErrorKind, MazeError, MazeLayout, MazeView, PlayerId, Position, Wall,
    MAX_WALLS,
};
use maze_duel_system_builder::{BuilderStage, MazeBuilder};

fn builder_with_endpoints(start: Position, end: Position) -> MazeBuilder {
    let mut builder = MazeBuilder::new();
    builder.select_start(start).expect("start accepted");
    builder.select_end(end).expect("end accepted");
    builder
}

/// Fifteen horizontal walls spread over rows that never seal a corridor.
fn budget_walls() -> Vec<Wall> {
    (0..MAX_WALLS as i32)
        .map(|index| Wall::new(Position::new(index % 5 + 1, index / 5), Direction::Right))
        .collect()
}

#[test]
fn end_equal_to_start_is_refused_and_stage_is_kept() {
    let mut builder = MazeBuilder::new();
    builder.select_start(Position::new(4, 4)).expect("start");

    let result = builder.select_end(Position::new(4, 4));

    assert_eq!(result, Err(MazeError::EndMatchesStart));
    assert_eq!(
        builder.stage(),
        BuilderStage::PickingEnd {
            start: Position::new(4, 4),
        },
        "builder must stay on the end step after a refused end",
    );
}

#[test]
fn sixteenth_wall_is_rejected() {
    let mut builder = builder_with_endpoints(Position::new(0, 0), Position::new(7, 7));
    for wall in budget_walls() {
        assert!(builder.toggle_wall(wall).expect("within budget"));
    }
    assert_eq!(builder.walls().len(), MAX_WALLS);
    assert_eq!(builder.remaining_walls(), 0);

    let extra = Wall::new(Position::new(6, 6), Direction::Down);
    let error = builder.toggle_wall(extra).expect_err("budget exhausted");

    assert_eq!(error, MazeError::WallBudgetExceeded { limit: MAX_WALLS });
    assert_eq!(error.kind(), ErrorKind::Validation);
    assert_eq!(builder.walls().len(), MAX_WALLS, "wall count must stay at the cap");
    assert!(!builder.walls().contains(extra));
}

#[test]
fn removing_at_the_cap_frees_a_slot() {
    let mut builder = builder_with_endpoints(Position::new(0, 0), Position::new(7, 7));
    let walls = budget_walls();
    for wall in &walls {
        let _ = builder.toggle_wall(*wall).expect("within budget");
    }

    assert!(!builder.toggle_wall(walls[0]).expect("removal always allowed"));
    assert_eq!(builder.remaining_walls(), 1);
    assert!(builder
        .toggle_wall(Wall::new(Position::new(6, 6), Direction::Down))
        .expect("slot freed"));
}

#[test]
fn extreme_wall_coordinates_are_out_of_bounds() {
    let mut builder = builder_with_endpoints(Position::new(0, 0), Position::new(7, 7));
    let position = Position::new(i32::MAX, 0);

    let result = builder.toggle_wall(Wall::new(position, Direction::Down));

    assert_eq!(result, Err(MazeError::OutOfBounds { position }));
    assert_eq!(result.map_err(|error| error.kind()), Err(ErrorKind::Validation));
    assert!(builder.walls().is_empty());
}

#[test]
fn toggling_from_the_other_side_removes_the_same_wall() {
    let mut builder = builder_with_endpoints(Position::new(0, 0), Position::new(7, 7));
    assert!(builder
        .toggle_wall(Wall::new(Position::new(2, 2), Direction::Down))
        .expect("placed"));
    assert!(!builder
        .toggle_wall(Wall::new(Position::new(3, 2), Direction::Up))
        .expect("removed"));
    assert!(builder.walls().is_empty());
}

#[test]
fn sealed_endpoint_cannot_be_submitted() {
    let mut builder = builder_with_endpoints(Position::new(0, 0), Position::new(0, 1));
    let _ = builder
        .toggle_wall(Wall::new(Position::new(0, 0), Direction::Right))
        .expect("placed");
    assert!(builder.is_valid(), "a detour through the second row remains");

    let _ = builder
        .toggle_wall(Wall::new(Position::new(0, 0), Direction::Down))
        .expect("placed");

    assert!(!builder.is_valid());
    assert_eq!(builder.submit(), Err(MazeError::NoPath));
    assert_eq!(builder.walls().len(), 2, "a failed submit keeps the design");
}

#[test]
fn submit_requires_both_endpoints() {
    let mut builder = MazeBuilder::new();
    assert_eq!(builder.submit(), Err(MazeError::MissingEndpoints));

    builder.select_start(Position::new(1, 1)).expect("start");
    assert_eq!(builder.submit(), Err(MazeError::MissingEndpoints));
    assert!(!builder.is_valid());
}

#[test]
fn submitted_maze_keeps_endpoints_and_walls() {
    let mut builder = builder_with_endpoints(Position::new(2, 3), Position::new(5, 6));
    let wall = Wall::new(Position::new(2, 3), Direction::Down);
    let _ = builder.toggle_wall(wall).expect("placed");

    let maze = builder.submit().expect("connected maze");

    assert_eq!(maze.start(), Position::new(2, 3));
    assert_eq!(maze.end(), Position::new(5, 6));
    assert!(maze.walls().contains(wall));
}

#[test]
fn back_clears_the_endpoint_of_the_stage_left_but_keeps_walls() {
    let mut builder = builder_with_endpoints(Position::new(0, 0), Position::new(7, 7));
    let wall = Wall::new(Position::new(4, 4), Direction::Left);
    let _ = builder.toggle_wall(wall).expect("placed");

    assert!(builder.back());
    assert_eq!(
        builder.stage(),
        BuilderStage::PickingEnd {
            start: Position::new(0, 0),
        }
    );
    assert!(builder.end().is_none());

    assert!(builder.back());
    assert_eq!(builder.stage(), BuilderStage::PickingStart);
    assert!(!builder.back(), "nothing before the first stage");
    assert!(builder.walls().contains(wall), "walls survive backward edits");

    builder.select_start(Position::new(7, 0)).expect("start");
    builder.select_end(Position::new(0, 7)).expect("end");
    assert!(builder.submit().expect("still connected").walls().contains(wall));
}

#[test]
fn loaded_layout_resumes_wall_editing() {
    let layout = MazeLayout {
        start: Position::new(0, 0),
        end: Position::new(3, 3),
        walls: vec![
            Wall::new(Position::new(1, 1), Direction::Right),
            Wall::new(Position::new(1, 2), Direction::Left),
        ],
    };

    let builder = MazeBuilder::load(&layout).expect("loadable");

    assert_eq!(
        builder.stage(),
        BuilderStage::PlacingWalls {
            start: Position::new(0, 0),
            end: Position::new(3, 3),
        }
    );
    assert_eq!(builder.walls().len(), 1, "duplicate walls collapse");
    assert_eq!(builder.remaining_walls(), MAX_WALLS - 1);
}

#[test]
fn loading_rejects_over_budget_layouts() {
    let mut walls = budget_walls();
    walls.push(Wall::new(Position::new(6, 6), Direction::Down));
    let layout = MazeLayout {
        start: Position::new(0, 0),
        end: Position::new(7, 7),
        walls,
    };

    assert_eq!(
        MazeBuilder::load(&layout),
        Err(MazeError::WallBudgetExceeded { limit: MAX_WALLS })
    );
}

#[test]
fn submit_command_carries_the_canonical_layout() {
    let mut builder = builder_with_endpoints(Position::new(0, 0), Position::new(1, 1));
    let _ = builder
        .toggle_wall(Wall::new(Position::new(0, 1), Direction::Left))
        .expect("placed");

    let command = builder
        .submit_command(PlayerId::new("alice"))
        .expect("valid maze");

    assert_eq!(
        command,
        Command::SubmitMaze {
            player: PlayerId::new("alice"),
            layout: MazeLayout {
                start: Position::new(0, 0),
                end: Position::new(1, 1),
                walls: vec![Wall::new(Position::new(0, 0), Direction::Right)],
            },
        }
    );
}
