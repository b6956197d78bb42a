use sv_field::Ef;

/// An evaluation claim: a multilinear point together with the claimed value
/// of some (implicit) polynomial at that point.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Evaluation {
    pub point: Vec<Ef>,
    pub value: Ef,
}

impl Evaluation {
    pub fn new(point: Vec<Ef>, value: Ef) -> Self {
        Self { point, value }
    }
}
