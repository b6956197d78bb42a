use std::collections::HashMap;
use std::ops::{Add, Mul, Sub};
use std::rc::Rc;

use sv_field::{Ef, Fp};

#[derive(Debug)]
enum NodeKind {
    Const(Fp),
    Input(usize),
    Add(Vec<CircuitNode>),
    Mul(Vec<CircuitNode>),
}

/// A node in an arithmetic-circuit DAG: `const`, `input`, `add`, or `mul`.
///
/// Nodes are shared by reference (`Rc`), not copied: building `a * a` does
/// not duplicate `a`'s subtree, and [`CircuitNode::evaluate`] memoizes on
/// node identity so a DAG with exponential fan-in as a tree still evaluates
/// in time linear in the number of distinct nodes.
#[derive(Clone, Debug)]
pub struct CircuitNode(Rc<NodeKind>);

impl CircuitNode {
    pub fn constant(v: Fp) -> Self {
        Self(Rc::new(NodeKind::Const(v)))
    }

    /// A reference to input slot `i` of the evaluation vector.
    pub fn input(i: usize) -> Self {
        Self(Rc::new(NodeKind::Input(i)))
    }

    pub fn sum(children: Vec<CircuitNode>) -> Self {
        Self(Rc::new(NodeKind::Add(children)))
    }

    pub fn product(children: Vec<CircuitNode>) -> Self {
        Self(Rc::new(NodeKind::Mul(children)))
    }

    fn identity(&self) -> usize {
        Rc::as_ptr(&self.0) as usize
    }

    /// Evaluate this circuit on `inputs`, memoizing shared subexpressions by
    /// node identity.
    pub fn evaluate(&self, inputs: &[Ef]) -> Ef {
        let mut memo = HashMap::new();
        self.eval_memoized(inputs, &mut memo)
    }

    fn eval_memoized(&self, inputs: &[Ef], memo: &mut HashMap<usize, Ef>) -> Ef {
        let key = self.identity();
        if let Some(&v) = memo.get(&key) {
            return v;
        }
        let value = match self.0.as_ref() {
            NodeKind::Const(c) => Ef::from_base(*c),
            NodeKind::Input(i) => inputs[*i],
            NodeKind::Add(children) => children
                .iter()
                .fold(Ef::ZERO, |acc, c| acc + c.eval_memoized(inputs, memo)),
            NodeKind::Mul(children) => children
                .iter()
                .fold(Ef::ONE, |acc, c| acc * c.eval_memoized(inputs, memo)),
        };
        memo.insert(key, value);
        value
    }
}

impl Add for CircuitNode {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        CircuitNode::sum(vec![self, rhs])
    }
}

impl Mul for CircuitNode {
    type Output = Self;
    fn mul(self, rhs: Self) -> Self {
        CircuitNode::product(vec![self, rhs])
    }
}

impl Sub for CircuitNode {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        self + (CircuitNode::constant(-Fp::ONE) * rhs)
    }
}

/// `1 - x`, built out of `const`/`add`/`mul` (there is no dedicated negation
/// node).
pub fn one_minus(x: &CircuitNode) -> CircuitNode {
    CircuitNode::constant(Fp::ONE) - x.clone()
}

/// The per-bit equality indicator `a*b + (1-a)(1-b)`.
pub fn eq_bit(a: &CircuitNode, b: &CircuitNode) -> CircuitNode {
    (a.clone() * b.clone()) + (one_minus(a) * one_minus(b))
}
