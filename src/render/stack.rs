/// The state of one level of block nesting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    /// The base of the stack, never popped.
    Root,
    /// Reserved for plain nested blocks.
    #[allow(dead_code)]
    Normal,
    /// Reserved for `#foreach` loops.
    #[allow(dead_code)]
    ForEach,
    /// An `#if` whose condition was true.
    IfActive,
    /// An `#if` whose condition was false.
    IfInactive,
    /// An `#elseif` whose condition was true.
    ElseIfActive,
    /// An `#elseif` whose condition was false.
    ElseIfInactive,
    /// An `#else` reached because no earlier branch was taken.
    ElseActive,
    /// A branch of the chain was already taken, everything up to the `#end`
    /// is suppressed.
    IfHandled,
}

/// A structural directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Block {
    If,
    ElseIf,
    Else,
    End,
}

/// What to do to the stack in response to a [`Block`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Open a new block.
    Push(State),
    /// Move the innermost block on to its next branch.
    Replace(State),
    /// Close the innermost block.
    Pop,
    /// The directive is not allowed here.
    Unexpected,
}

/// The stack of open blocks.
///
/// Always contains the [`State::Root`] state at the bottom.
#[derive(Debug)]
pub struct Stack {
    states: Vec<State>,
}

impl State {
    /// Whether content directly within this block is emitted.
    pub fn is_live(self) -> bool {
        match self {
            Self::Root | Self::Normal | Self::ForEach => true,
            Self::IfActive | Self::ElseIfActive | Self::ElseActive => true,
            Self::IfInactive | Self::ElseIfInactive | Self::IfHandled => false,
        }
    }
}

/// Returns the transition for `block` given the innermost state `top`.
///
/// The condition is only evaluated when the transition depends on it, i.e.
/// for every `#if` and for an `#elseif` that follows a branch that was not
/// taken.
pub fn transition<F, E>(top: State, block: Block, cond: F) -> Result<Transition, E>
where
    F: FnOnce() -> Result<bool, E>,
{
    use State::*;

    let t = match (block, top) {
        (Block::If, _) => Transition::Push(if cond()? { IfActive } else { IfInactive }),

        (Block::ElseIf, IfActive | ElseIfActive | IfHandled) => Transition::Replace(IfHandled),
        (Block::ElseIf, IfInactive | ElseIfInactive) => {
            Transition::Replace(if cond()? { ElseIfActive } else { ElseIfInactive })
        }
        (Block::ElseIf, Root | Normal | ForEach | ElseActive) => Transition::Unexpected,

        (Block::Else, IfActive | ElseIfActive | IfHandled) => Transition::Replace(IfHandled),
        (Block::Else, IfInactive | ElseIfInactive) => Transition::Replace(ElseActive),
        (Block::Else, Root | Normal | ForEach | ElseActive) => Transition::Unexpected,

        (Block::End, Root) => Transition::Unexpected,
        (
            Block::End,
            Normal | ForEach | IfActive | IfInactive | ElseIfActive | ElseIfInactive
            | ElseActive | IfHandled,
        ) => Transition::Pop,
    };
    Ok(t)
}

impl Stack {
    pub fn new() -> Self {
        Self {
            states: vec![State::Root],
        }
    }

    /// Returns the innermost state.
    pub fn top(&self) -> State {
        match self.states.last() {
            Some(state) => *state,
            None => unreachable!("root state popped"),
        }
    }

    /// Returns `true` if content at the current position is emitted.
    ///
    /// Only the innermost block is considered, so a live block nested
    /// inside a suppressed one is emitted.
    pub fn is_live(&self) -> bool {
        self.top().is_live()
    }

    /// Returns the number of open blocks, not counting the root.
    pub fn depth(&self) -> usize {
        self.states.len() - 1
    }

    /// Applies a transition.
    ///
    /// # Panics
    ///
    /// If the transition is [`Transition::Unexpected`] or would pop the
    /// root state.
    pub fn apply(&mut self, t: Transition) {
        match t {
            Transition::Push(state) => self.states.push(state),
            Transition::Replace(state) => {
                if let Some(top) = self.states.last_mut() {
                    *top = state;
                }
            }
            Transition::Pop => {
                assert!(self.depth() > 0, "attempted to pop the root state");
                self.states.pop();
            }
            Transition::Unexpected => panic!("attempted to apply an unexpected transition"),
        }
    }
}

impl Block {
    pub fn human(&self) -> &'static str {
        match self {
            Self::If => "#if",
            Self::ElseIf => "#elseif",
            Self::Else => "#else",
            Self::End => "#end",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use State::*;

    fn t(top: State, block: Block, cond: bool) -> Transition {
        transition::<_, ()>(top, block, || Ok(cond)).unwrap()
    }

    fn t_no_eval(top: State, block: Block) -> Transition {
        transition::<_, ()>(top, block, || panic!("condition should not be evaluated")).unwrap()
    }

    #[test]
    fn transition_if() {
        for top in [Root, IfActive, IfInactive, ElseActive, IfHandled] {
            assert_eq!(t(top, Block::If, true), Transition::Push(IfActive));
            assert_eq!(t(top, Block::If, false), Transition::Push(IfInactive));
        }
    }

    #[test]
    fn transition_elseif() {
        assert_eq!(t_no_eval(IfActive, Block::ElseIf), Transition::Replace(IfHandled));
        assert_eq!(t_no_eval(ElseIfActive, Block::ElseIf), Transition::Replace(IfHandled));
        assert_eq!(t_no_eval(IfHandled, Block::ElseIf), Transition::Replace(IfHandled));
        assert_eq!(t(IfInactive, Block::ElseIf, true), Transition::Replace(ElseIfActive));
        assert_eq!(t(ElseIfInactive, Block::ElseIf, false), Transition::Replace(ElseIfInactive));
        assert_eq!(t_no_eval(Root, Block::ElseIf), Transition::Unexpected);
        assert_eq!(t_no_eval(ElseActive, Block::ElseIf), Transition::Unexpected);
    }

    #[test]
    fn transition_else() {
        assert_eq!(t_no_eval(IfActive, Block::Else), Transition::Replace(IfHandled));
        assert_eq!(t_no_eval(ElseIfActive, Block::Else), Transition::Replace(IfHandled));
        assert_eq!(t_no_eval(IfHandled, Block::Else), Transition::Replace(IfHandled));
        assert_eq!(t_no_eval(IfInactive, Block::Else), Transition::Replace(ElseActive));
        assert_eq!(t_no_eval(ElseIfInactive, Block::Else), Transition::Replace(ElseActive));
        assert_eq!(t_no_eval(Root, Block::Else), Transition::Unexpected);
        assert_eq!(t_no_eval(ElseActive, Block::Else), Transition::Unexpected);
    }

    #[test]
    fn transition_end() {
        assert_eq!(t_no_eval(Root, Block::End), Transition::Unexpected);
        for top in [IfActive, IfInactive, ElseIfActive, ElseIfInactive, ElseActive, IfHandled] {
            assert_eq!(t_no_eval(top, Block::End), Transition::Pop);
        }
    }

    #[test]
    fn transition_propagates_condition_error() {
        let err = transition(IfInactive, Block::ElseIf, || Err("boom")).unwrap_err();
        assert_eq!(err, "boom");
    }

    #[test]
    fn stack_live_follows_innermost_block() {
        let mut stack = Stack::new();
        assert!(stack.is_live());
        stack.apply(Transition::Push(IfInactive));
        assert!(!stack.is_live());
        stack.apply(Transition::Push(IfActive));
        assert_eq!(stack.top(), IfActive);
        assert!(stack.is_live());
        stack.apply(Transition::Pop);
        assert!(!stack.is_live());
        stack.apply(Transition::Replace(ElseActive));
        assert!(stack.is_live());
        assert_eq!(stack.depth(), 1);
        stack.apply(Transition::Pop);
        assert_eq!(stack.depth(), 0);
        assert_eq!(stack.top(), Root);
    }
}
