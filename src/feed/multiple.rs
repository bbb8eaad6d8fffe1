use std::iter::FromIterator;
use std::ops::{Deref, DerefMut};

/// The values of a field that may occur any number of times, in document
/// order.
#[derive(Clone, Debug, PartialEq)]
pub struct Multiple<T>(pub Vec<T>);

impl<T> Multiple<T> {
    pub fn new() -> Multiple<T> {
        Multiple(Vec::new())
    }

    /// Push a default value and hand it back for filling in.
    pub fn append_new(&mut self) -> &mut T where T: Default {
        self.0.push(Default::default());
        let last = self.0.len() - 1;
        &mut self.0[last]
    }
}

impl<T> Default for Multiple<T> {
    fn default() -> Multiple<T> {
        Multiple::new()
    }
}

impl<T> Deref for Multiple<T> {
    type Target = Vec<T>;
    fn deref(&self) -> &Vec<T> { &self.0 }
}

impl<T> DerefMut for Multiple<T> {
    fn deref_mut(&mut self) -> &mut Vec<T> { &mut self.0 }
}

impl<T> FromIterator<T> for Multiple<T> {
    fn from_iter<I: IntoIterator<Item=T>>(iterator: I) -> Self {
        Multiple(FromIterator::from_iter(iterator))
    }
}

impl<T> From<Vec<T>> for Multiple<T> {
    fn from(values: Vec<T>) -> Multiple<T> {
        Multiple(values)
    }
}

impl<'a, T> IntoIterator for &'a Multiple<T> {
    type Item = &'a T;
    type IntoIter = ::std::slice::Iter<'a, T>;
    fn into_iter(self) -> Self::IntoIter { self.0.iter() }
}


#[cfg(test)]
mod test {
    use super::Multiple;

    #[test]
    fn test_append_new() {
        let mut names: Multiple<String> = Multiple::new();
        names.append_new().push_str("foo");
        *names.append_new() = "bar".to_owned();
        assert_eq!(names.len(), 2);
        assert_eq!(&names[..], ["foo".to_owned(), "bar".to_owned()]);
    }

    #[test]
    fn test_collect() {
        let m: Multiple<u32> = (1..4).collect();
        assert_eq!(*m, vec![1, 2, 3]);
        assert_eq!(m.iter().sum::<u32>(), 6);
    }
}
