//! Construction of the four DEVStone towers.
//!
//! Every level `l` (the top is `l = depth`) is a coupled model `C{l-1}` with
//! ports `in` and `out`; HO adds `inAux`/`outAux` and HOmod adds `inAux`.
//! Level 1 holds a single atomic wired `in → atomic → out`.  Above it:
//!
//! - **LI**: `in → C{l-2}.in`, `C{l-2}.out → out`, and `in` to each of the
//!   `width - 1` atomics.
//! - **HI**: LI plus `A_k.out → A_{k+1}.in` along the row.
//! - **HO**: as HI, but the atomics are fed from `inAux`, `inAux` is also
//!   passed down, and every atomic output goes to `outAux`.
//! - **HOmod**: `width` rows of atomics; rows 0 and 1 hold `width - 1`
//!   atomics, row `i ≥ 2` holds `width - i`.  `inAux` feeds all of row 0 and
//!   the first atomic of every other row; row 0 feeds `C{l-2}.inAux`; every
//!   row-1 atomic feeds every row-0 atomic; atomic `j` of row `i ≥ 2` feeds
//!   atomic `j + 1` of row `i - 1`.

use devs_core::{DevsResult, ModelId};
use devs_model::ModelTree;
use tracing::debug;

use crate::{BenchKind, BenchResult, DevStoneAtomic, DevStoneGenerator, DevStoneParams};

/// A built benchmark tree.
pub struct DevStone {
    pub tree:      ModelTree,
    pub kind:      BenchKind,
    pub generator: ModelId,
    /// The outermost coupled model of the tower.
    pub top:       ModelId,
    /// Every `DevStoneAtomic`, in creation order.
    pub atomics:   Vec<ModelId>,
}

/// Validate `params` and build the tree: a root holding the generator and
/// the tower.
pub fn build_devstone(params: &DevStoneParams) -> BenchResult<DevStone> {
    params.validate()?;

    let mut tree = ModelTree::new("devstone");
    let root = tree.root();
    let generator = tree.add_atomic(
        root,
        "generator",
        DevStoneGenerator::new(params.preparation_time, params.period, params.max_events),
    )?;

    let mut tower = Tower { tree: &mut tree, params, atomics: Vec::new() };
    let top = tower.level(root, params.depth)?;
    let atomics = tower.atomics;

    tree.couple(root, generator, "out", top, "in")?;
    if params.kind.has_aux_input() {
        tree.couple(root, generator, "out", top, "inAux")?;
    }

    debug!(
        kind = %params.kind,
        width = params.width,
        depth = params.depth,
        models = tree.len(),
        atomics = atomics.len(),
        "devstone tree built"
    );
    Ok(DevStone { tree, kind: params.kind, generator, top, atomics })
}

struct Tower<'a> {
    tree:    &'a mut ModelTree,
    params:  &'a DevStoneParams,
    atomics: Vec<ModelId>,
}

impl Tower<'_> {
    fn atomic(&mut self, parent: ModelId, name: String) -> DevsResult<ModelId> {
        let p = self.params;
        let id = self.tree.add_atomic(
            parent,
            name,
            DevStoneAtomic::new(p.preparation_time, p.int_delay_ms, p.ext_delay_ms),
        )?;
        self.atomics.push(id);
        Ok(id)
    }

    /// Build level `depth` under `parent` and everything below it.
    fn level(&mut self, parent: ModelId, depth: u32) -> DevsResult<ModelId> {
        let kind = self.params.kind;
        let c = self.tree.add_coupled(parent, format!("C{}", depth - 1))?;
        self.tree.add_in_port(c, "in")?;
        self.tree.add_out_port(c, "out")?;
        if kind.has_aux_input() {
            self.tree.add_in_port(c, "inAux")?;
        }
        if kind == BenchKind::Ho {
            self.tree.add_out_port(c, "outAux")?;
        }

        if depth == 1 {
            let a = self.atomic(c, "A1".into())?;
            self.tree.couple(c, c, "in", a, "in")?;
            self.tree.couple(c, a, "out", c, "out")?;
            return Ok(c);
        }

        let child = self.level(c, depth - 1)?;
        self.tree.couple(c, c, "in", child, "in")?;
        self.tree.couple(c, child, "out", c, "out")?;

        match kind {
            BenchKind::Li | BenchKind::Hi => self.row(c, depth, "in", kind == BenchKind::Hi)?,
            BenchKind::Ho => {
                self.tree.couple(c, c, "inAux", child, "inAux")?;
                self.row(c, depth, "inAux", true)?;
            }
            BenchKind::HoMod => self.grid(c, child, depth)?,
        }
        Ok(c)
    }

    /// The `width - 1` atomics of an LI/HI/HO level.
    fn row(&mut self, c: ModelId, depth: u32, feed: &str, chain: bool) -> DevsResult<()> {
        let is_ho = self.params.kind == BenchKind::Ho;
        let mut prev: Option<ModelId> = None;
        for k in 1..self.params.width {
            let a = self.atomic(c, format!("A{depth}_{k}"))?;
            self.tree.couple(c, c, feed, a, "in")?;
            if let (true, Some(p)) = (chain, prev) {
                self.tree.couple(c, p, "out", a, "in")?;
            }
            if is_ho {
                self.tree.couple(c, a, "out", c, "outAux")?;
            }
            prev = Some(a);
        }
        Ok(())
    }

    /// The triangular atomic grid of an HOmod level.
    fn grid(&mut self, c: ModelId, child: ModelId, depth: u32) -> DevsResult<()> {
        let w = self.params.width as usize;
        let mut rows: Vec<Vec<ModelId>> = Vec::with_capacity(w);
        for i in 0..w {
            let first = if i < 2 { 0 } else { i - 1 };
            let mut row = Vec::with_capacity(w - 1 - first);
            for j in first..w - 1 {
                row.push(self.atomic(c, format!("A{depth}_{i}_{j}"))?);
            }
            rows.push(row);
        }

        for &a in &rows[0] {
            self.tree.couple(c, c, "inAux", a, "in")?;
            self.tree.couple(c, a, "out", child, "inAux")?;
        }
        for row in &rows[1..] {
            if let Some(&first) = row.first() {
                self.tree.couple(c, c, "inAux", first, "in")?;
            }
        }
        if let Some(row1) = rows.get(1) {
            for &top in &rows[0] {
                for &down in row1 {
                    self.tree.couple(c, down, "out", top, "in")?;
                }
            }
        }
        for i in 2..w {
            for (j, &a) in rows[i].iter().enumerate() {
                self.tree.couple(c, a, "out", rows[i - 1][j + 1], "in")?;
            }
        }
        Ok(())
    }
}
