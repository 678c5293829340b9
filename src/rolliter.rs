use crate::roll::Outcome;
use readfilter::CharWhitelist as CharWhitelistIter;
use std::io::Read;

/// Outcomes read from a byte stream. Anything that is not a digit 1 through 7 is skipped, so
/// `"3 5,7\n1"` yields four outcomes.
pub struct OutcomeIter<R>
where
    R: Read,
{
    input: CharWhitelistIter<R>,
}

impl<R> OutcomeIter<R>
where
    R: Read,
{
    pub fn new(input: R) -> Self {
        Self {
            input: CharWhitelistIter::new(input, "1234567"),
        }
    }
}

impl<R> Iterator for OutcomeIter<R>
where
    R: Read,
{
    type Item = Outcome;

    fn next(&mut self) -> Option<Self::Item> {
        let mut buf = [0; 1];
        match self.input.read(&mut buf) {
            Err(_) => None,
            Ok(0) => None,
            Ok(_) => Outcome::from_char(buf[0] as char),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::OutcomeIter;
    use std::io::{self, Read};

    fn values(s: &str) -> Vec<u8> {
        OutcomeIter::new(s.as_bytes()).map(|o| o.value()).collect()
    }

    #[test]
    fn whitelist() {
        assert_eq!(values("3 5,7\n1"), vec![3, 5, 7, 1]);
        assert_eq!(values("0 8 9 x"), Vec::<u8>::new());
        assert_eq!(values("1234567"), vec![1, 2, 3, 4, 5, 6, 7]);
        assert_eq!(values(""), Vec::<u8>::new());
    }

    #[test]
    fn out_of_range_digits_mid_stream() {
        assert_eq!(values("18273"), vec![1, 2, 7, 3]);
        assert_eq!(values("7\n7\n7\n"), vec![7, 7, 7]);
    }

    struct Broken;

    impl Read for Broken {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::Other, "broken"))
        }
    }

    #[test]
    fn read_error_ends() {
        assert_eq!(OutcomeIter::new(Broken).count(), 0);
    }
}
