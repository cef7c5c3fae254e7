use super::*;

/// Places mines by drawing uniformly random cells and retrying on collision until the requested count is reached.
///
/// Deterministic for a given seed. A config with no free cell left gets a board that is all mines.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RejectionSampler {
    seed: u64,
}

impl RejectionSampler {
    pub const fn new(seed: u64) -> Self {
        Self { seed }
    }

    pub const fn seed(&self) -> u64 {
        self.seed
    }
}

impl MineGenerator for RejectionSampler {
    fn generate(self, config: GameConfig) -> MineLayout {
        use rand::prelude::*;

        log::debug!(
            "Placing {} mines on a {}x{} board, seed: {}",
            config.mines,
            config.size,
            config.size,
            self.seed
        );

        let total_cells = config.total_cells();
        let shape = (config.size, config.size).to_nd_index();

        // no free cell to draw, the loop below would never finish
        if config.mines >= total_cells {
            if config.mines > total_cells {
                log::warn!(
                    "Board already full, requested {} mines but only {} fit",
                    config.mines,
                    total_cells
                );
            }
            return MineLayout::from_mine_mask(Array2::from_elem(shape, true));
        }

        let mut mine_mask: Array2<bool> = Array2::default(shape);
        let mut rng = SmallRng::seed_from_u64(self.seed);
        let mut mines_placed: CellCount = 0;

        while mines_placed < config.mines {
            let coords: Coord2 = (
                rng.random_range(0..config.size),
                rng.random_range(0..config.size),
            );
            let cell = &mut mine_mask[coords.to_nd_index()];
            if *cell {
                log::trace!("Mine already at {:?}, drawing again", coords);
                continue;
            }
            *cell = true;
            mines_placed += 1;
        }

        MineLayout::from_mine_mask(mine_mask)
    }
}
