/// Stack-growth helper for deeply recursive code.
///
/// The parser and the evaluator both recurse once per nesting level of the
/// source program. Wrapping those recursion points lets deeply nested or
/// deeply recursive programs grow the stack on the heap instead of
/// overflowing the host thread's stack.
pub mod stack;
