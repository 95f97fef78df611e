//! Frame discovery in encoded documents.

use std::iter::FusedIterator;

use specwire_codec::Node;

/// Key of the first field of a frame.
pub const STEP_NAME: &str = "step_name";

/// Key of the second field of a frame.
pub const PURGE: &str = "purge";

/// The two fields of one transmittable step, borrowed from the document.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransmissionFrame<'a> {
    pub step_name: &'a Node,
    pub purge: &'a Node,
}

/// Lazy depth-first, pre-order walk yielding every frame in document order.
///
/// A mapping is a frame as soon as it holds both [`STEP_NAME`] and
/// [`PURGE`], whatever else it holds and however deeply it is nested. The
/// walk still descends into every value of a frame mapping, so nested frames
/// are found too.
///
/// The walk is single-pass. To see the frames again, call
/// [`extract_frames`] on the document again:
///
/// ```compile_fail
/// use specwire_codec::Node;
///
/// let document = Node::string("0101");
/// let frames = specwire_frame::extract_frames(&document);
/// let _again = frames.clone();
/// ```
#[derive(Debug)]
pub struct Frames<'a> {
    stack: Vec<&'a Node>,
}

/// Walk `document` for frames.
pub fn extract_frames(document: &Node) -> Frames<'_> {
    Frames {
        stack: vec![document],
    }
}

impl<'a> Iterator for Frames<'a> {
    type Item = TransmissionFrame<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(node) = self.stack.pop() {
            match node {
                Node::Mapping(mapping) => {
                    self.stack.extend(mapping.values().rev());
                    if let (Some(step_name), Some(purge)) =
                        (mapping.get(STEP_NAME), mapping.get(PURGE))
                    {
                        return Some(TransmissionFrame { step_name, purge });
                    }
                }
                Node::Sequence(items) => self.stack.extend(items.iter().rev()),
                Node::Scalar(_) => {}
            }
        }
        None
    }
}

impl FusedIterator for Frames<'_> {}
