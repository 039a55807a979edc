//! Tree compiler and odometer node protocol.
//!
//! [`compile`] expands a start production into a finite tree of
//! alternation/sequence nodes. Recursion is bounded per path: a production
//! that already occurs twice on the current ancestry expands to a
//! [`Node::Sentinel`] instead of recursing further, and pruning then removes
//! every alternative that still contains a sentinel. What survives is a
//! strict tree (each production occurrence gets its own node, no sharing),
//! which the enumerator walks as a mixed-radix counter: `advance` ripples a
//! carry right-to-left, `render` writes the current combination.

use im::Vector;
use miette::SourceSpan;

use crate::errors::{
    to_source_span, unspanned, EnumError, ErrorKind, ErrorReporting, Reporter,
};
use crate::grammar::{GrammarStore, Symbol};

/// A production may expand at most this many times on any root-to-leaf path
/// before the next occurrence is cut off with a sentinel. Two levels keep
/// genuinely recursive shapes (binary operators, nested expressions) while
/// guaranteeing a finite tree.
const RECURSION_BOUND: usize = 2;

/// One node of the compiled tree. The enum is closed: every algorithm below
/// matches exhaustively, so a new variant cannot be added without updating
/// all of them.
#[derive(Debug)]
pub(crate) enum Node {
    /// A fixed terminal: renders its text plus one separating space.
    Literal(String),
    /// Recursion cutoff marker. Never survives pruning; visiting one during
    /// enumeration is a defect in the compiler, not in the grammar.
    Sentinel,
    /// The expansion of one alternative: all children render in order.
    Sequence(Vec<Node>),
    /// One occurrence of a production: exactly one choice is active.
    Alternation(Alternation),
}

/// Disjunction node with a cursor selecting the active alternative.
#[derive(Debug)]
pub(crate) struct Alternation {
    name: String,
    choices: Vec<Node>,
    cursor: usize,
    pruned: bool,
}

// ============================================================================
// COMPILATION
// ============================================================================

/// Compile the grammar reachable from `start` into a pruned, verified tree.
pub(crate) fn compile(store: &GrammarStore, start: &str) -> Result<Alternation, EnumError> {
    let reporter = Reporter::new(store.source().clone(), "compile");
    let mut root = expand_production(store, start, unspanned(), &Vector::new(), &reporter)?;
    root.prune();
    if root.choices.is_empty() {
        return Err(reporter.report(
            ErrorKind::NoFiniteDerivation {
                start: start.to_string(),
            },
            unspanned(),
        ));
    }
    verify(&root, &reporter)?;
    Ok(root)
}

fn expand_production(
    store: &GrammarStore,
    name: &str,
    span: SourceSpan,
    ancestry: &Vector<String>,
    reporter: &Reporter,
) -> Result<Alternation, EnumError> {
    let production = store
        .get(name)
        .ok_or_else(|| reporter.production_not_found(name, span))?;

    // Ancestry is immutable and per-branch: every expansion below this
    // production sees its own extended copy, so sibling branches (and
    // concurrent compilations from a shared store) never observe each
    // other's path state.
    let mut branch_ancestry = ancestry.clone();
    branch_ancestry.push_back(name.to_string());

    let mut choices = Vec::with_capacity(production.alternatives.len());
    for alternative in &production.alternatives {
        let mut items = Vec::with_capacity(alternative.items.len());
        for symbol in &alternative.items {
            items.push(expand_symbol(store, symbol, &branch_ancestry, reporter)?);
        }
        choices.push(Node::Sequence(items));
    }
    Ok(Alternation {
        name: name.to_string(),
        choices,
        cursor: 0,
        pruned: false,
    })
}

fn expand_symbol(
    store: &GrammarStore,
    symbol: &Symbol,
    ancestry: &Vector<String>,
    reporter: &Reporter,
) -> Result<Node, EnumError> {
    if let Some(text) = symbol.literal_text() {
        return Ok(Node::Literal(text.to_string()));
    }
    let name = symbol.text.as_str();
    let occurrences = ancestry.iter().filter(|a| a.as_str() == name).count();
    if occurrences >= RECURSION_BOUND {
        return Ok(Node::Sentinel);
    }
    let nested = expand_production(store, name, to_source_span(symbol.span), ancestry, reporter)?;
    Ok(Node::Alternation(nested))
}

// ============================================================================
// NODE PROTOCOL
// ============================================================================

impl Node {
    /// Move to the next combination; true means this node wrapped back to
    /// its first combination and carries into whatever visits it next.
    fn advance(&mut self) -> bool {
        match self {
            // A literal has exactly one combination: every visit overflows.
            Node::Literal(_) => true,
            Node::Sentinel => unreachable!("sentinel node visited during enumeration"),
            Node::Sequence(items) => {
                let mut carry = true;
                for item in items.iter_mut().rev() {
                    carry = item.advance();
                    if !carry {
                        break;
                    }
                }
                carry
            }
            Node::Alternation(alternation) => alternation.advance(),
        }
    }

    /// Write the current combination's text. Does not mutate state.
    fn render(&self, out: &mut String) {
        match self {
            Node::Literal(text) => {
                if !text.is_empty() {
                    out.push_str(text);
                    out.push(' ');
                }
            }
            Node::Sentinel => unreachable!("sentinel node rendered"),
            Node::Sequence(items) => {
                for item in items {
                    item.render(out);
                }
            }
            Node::Alternation(alternation) => alternation.render(out),
        }
    }
}

impl Alternation {
    pub(crate) fn advance(&mut self) -> bool {
        if self.choices[self.cursor].advance() {
            self.cursor += 1;
            if self.cursor >= self.choices.len() {
                self.cursor = 0;
                return true;
            }
        }
        false
    }

    pub(crate) fn render(&self, out: &mut String) {
        self.choices[self.cursor].render(out);
    }

    /// Drop every alternative that still contains a sentinel as an immediate
    /// child, recursing into nested alternations first. An alternation left
    /// with no choices is itself dead and reported to the caller, so pruning
    /// propagates upward instead of leaving an empty alternation for the
    /// enumerator to trip over.
    ///
    /// Idempotent: a second invocation (from another parent scanning its
    /// children) is a no-op.
    pub(crate) fn prune(&mut self) -> bool {
        if self.pruned {
            return self.choices.is_empty();
        }
        self.pruned = true;
        self.choices.retain_mut(|choice| match choice {
            Node::Sequence(items) => !items.iter_mut().any(|item| match item {
                Node::Sentinel => true,
                Node::Alternation(nested) => nested.prune(),
                Node::Literal(_) | Node::Sequence(_) => false,
            }),
            // Choices are built as sequences, one per alternative.
            _ => unreachable!("alternation choice is not a sequence"),
        });
        self.choices.is_empty()
    }

    #[cfg(test)]
    fn choice_count(&self) -> usize {
        self.choices.len()
    }
}

// ============================================================================
// POST-PRUNE VERIFICATION
// ============================================================================

/// Invariant check run once at the end of compilation: no sentinel survives
/// and no alternation is left without choices. A failure here is a defect in
/// the compiler or pruner and is reported as such, distinct from grammar
/// errors.
pub(crate) fn verify(root: &Alternation, reporter: &Reporter) -> Result<(), EnumError> {
    verify_alternation(root, reporter)
}

fn verify_alternation(alternation: &Alternation, reporter: &Reporter) -> Result<(), EnumError> {
    if alternation.choices.is_empty() {
        return Err(reporter.internal_invariant(
            &format!(
                "alternation '{}' has no surviving alternatives",
                alternation.name
            ),
            unspanned(),
        ));
    }
    if alternation.cursor >= alternation.choices.len() {
        return Err(reporter.internal_invariant(
            &format!("alternation '{}' cursor out of range", alternation.name),
            unspanned(),
        ));
    }
    alternation
        .choices
        .iter()
        .try_for_each(|choice| verify_node(choice, reporter))
}

fn verify_node(node: &Node, reporter: &Reporter) -> Result<(), EnumError> {
    match node {
        Node::Literal(_) => Ok(()),
        Node::Sentinel => Err(reporter.internal_invariant("sentinel survived pruning", unspanned())),
        Node::Sequence(items) => items
            .iter()
            .try_for_each(|item| verify_node(item, reporter)),
        Node::Alternation(alternation) => verify_alternation(alternation, reporter),
    }
}
