//! Ball family: four kinds sharing common circle state (spec §3, §9).

mod ball;
mod clone;
mod food;
mod spore;
mod thorn;

pub use ball::{BallData, BallKind};
pub use clone::CloneBall;
pub use food::FoodBall;
pub use spore::SporeBall;
pub use thorn::ThornBall;

use crate::ids::BallId;

/// A tagged union over the four ball kinds, used wherever code needs to
/// treat balls uniformly (collision index, rules engine) without deep
/// inheritance (spec §9 "Heterogeneous bodies").
#[derive(Debug, Clone)]
pub enum BallEntry {
    Food(FoodBall),
    Spore(SporeBall),
    Thorn(ThornBall),
    Clone(CloneBall),
}

impl BallEntry {
    #[inline]
    pub fn data(&self) -> &BallData {
        match self {
            BallEntry::Food(b) => &b.data,
            BallEntry::Spore(b) => &b.data,
            BallEntry::Thorn(b) => &b.data,
            BallEntry::Clone(b) => &b.data,
        }
    }

    #[inline]
    pub fn data_mut(&mut self) -> &mut BallData {
        match self {
            BallEntry::Food(b) => &mut b.data,
            BallEntry::Spore(b) => &mut b.data,
            BallEntry::Thorn(b) => &mut b.data,
            BallEntry::Clone(b) => &mut b.data,
        }
    }

    #[inline]
    pub fn id(&self) -> BallId {
        self.data().id
    }

    #[inline]
    pub fn kind(&self) -> BallKind {
        match self {
            BallEntry::Food(_) => BallKind::Food,
            BallEntry::Spore(_) => BallKind::Spore,
            BallEntry::Thorn(_) => BallKind::Thorn,
            BallEntry::Clone(_) => BallKind::Clone,
        }
    }

    #[inline]
    pub fn as_clone(&self) -> Option<&CloneBall> {
        match self {
            BallEntry::Clone(c) => Some(c),
            _ => None,
        }
    }

    #[inline]
    pub fn as_clone_mut(&mut self) -> Option<&mut CloneBall> {
        match self {
            BallEntry::Clone(c) => Some(c),
            _ => None,
        }
    }

    #[inline]
    pub fn as_thorn_mut(&mut self) -> Option<&mut ThornBall> {
        match self {
            BallEntry::Thorn(t) => Some(t),
            _ => None,
        }
    }
}
